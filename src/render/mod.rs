//! Fixed-column text tables for annotation views.

use std::iter;

use strum::{EnumCount, IntoEnumIterator};

use crate::annotation::Annotation;

pub mod format;

pub use format::{Column, DisplayField, DisplayRecord, ELLIPSIS};

const TITLE: &str = "RESULTS";
const EMPTY_MESSAGE: &str = "NO RESULTS";
const RULE: char = '-';
const BORDER: char = '|';
const CELL_MARGIN: &str = "  ";

/// Column widths for one table: the widest field seen in each column,
/// never more than the column's maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnWidths([usize; Column::COUNT]);

impl ColumnWidths {
    pub fn measure<'a>(records: impl IntoIterator<Item = &'a DisplayRecord>) -> Self {
        let mut widths = [0usize; Column::COUNT];
        for record in records {
            for (slot, column) in widths.iter_mut().zip(Column::iter()) {
                *slot = (*slot).max(record.field(column).width);
            }
        }
        for (slot, column) in widths.iter_mut().zip(Column::iter()) {
            *slot = (*slot).min(column.max_width());
        }
        Self(widths)
    }

    pub fn get(&self, column: Column) -> usize {
        self.0[column as usize]
    }

    /// Width of a full row: every column, its margins and the borders.
    pub fn total(&self) -> usize {
        let margins = Column::COUNT * 2 * CELL_MARGIN.len();
        let borders = Column::COUNT + 1;
        self.0.iter().sum::<usize>() + margins + borders
    }

    fn row(&self, record: &DisplayRecord) -> String {
        let mut line = String::with_capacity(self.total());
        line.push(BORDER);
        for column in Column::iter() {
            let field = record.field(column);
            line.push_str(CELL_MARGIN);
            line.push_str(&field.text);
            line.extend(iter::repeat(' ').take(self.get(column).saturating_sub(field.width)));
            line.push_str(CELL_MARGIN);
            line.push(BORDER);
        }
        line
    }
}

/// Renders `view` in the given order as printable lines.
pub fn render_table(view: &[&Annotation]) -> Vec<String> {
    let header = DisplayRecord::header();
    let rows: Vec<DisplayRecord> = view
        .iter()
        .map(|annotation| DisplayRecord::from_annotation(annotation))
        .collect();
    let widths = ColumnWidths::measure(iter::once(&header).chain(rows.iter()));
    let total = widths.total();
    let rule: String = iter::repeat(RULE).take(total).collect();

    let mut lines = Vec::with_capacity(rows.len().max(1) + 5);
    lines.push(center(TITLE, total, RULE));
    lines.push(rule.clone());
    lines.push(widths.row(&header));
    lines.push(rule.clone());
    if rows.is_empty() {
        let inner = total.saturating_sub(2);
        lines.push(format!("{BORDER}{}{BORDER}", center(EMPTY_MESSAGE, inner, ' ')));
    } else {
        lines.extend(rows.iter().map(|record| widths.row(record)));
    }
    lines.push(rule);
    lines
}

/// Pads `text` with `filler` to `width` characters; odd leftovers go to the right.
pub fn center(text: &str, width: usize, filler: char) -> String {
    let text_width = format::char_width(text);
    let leftover = width.saturating_sub(text_width);
    let lead = leftover / 2;
    let mut out = String::with_capacity(width);
    out.extend(iter::repeat(filler).take(lead));
    out.push_str(text);
    out.extend(iter::repeat(filler).take(leftover - lead));
    out
}
