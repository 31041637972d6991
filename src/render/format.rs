use strum::{EnumCount, EnumIter, IntoEnumIterator};
use unicode_segmentation::UnicodeSegmentation;

use crate::annotation::{Annotation, EMPHASIS};

pub const ELLIPSIS: char = '…';
const ELLIPSIS_WIDTH: usize = 1;

/// Table columns in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumCount, EnumIter)]
pub enum Column {
    Importance,
    User,
    Date,
    Text,
    File,
}

impl Column {
    pub fn max_width(self) -> usize {
        match self {
            Column::Importance => 1,
            Column::User => 10,
            Column::Date => 10,
            Column::Text => 50,
            Column::File => 10,
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Importance => "!",
            Column::User => "user",
            Column::Date => "date",
            Column::Text => "comment",
            Column::File => "file",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayField {
    pub text: String,
    pub width: usize,
}

impl DisplayField {
    /// Fits `value` into `max_width` characters, ending in `…` when cut.
    /// Width is counted in grapheme clusters, not terminal columns.
    pub fn fit(value: &str, max_width: usize) -> Self {
        let width = char_width(value);
        if width <= max_width {
            return Self {
                text: value.to_owned(),
                width,
            };
        }
        let budget = max_width.saturating_sub(ELLIPSIS_WIDTH);
        let mut text: String = value.graphemes(true).take(budget).collect();
        text.push(ELLIPSIS);
        Self {
            text,
            width: budget + ELLIPSIS_WIDTH,
        }
    }
}

/// Number of user-perceived characters in `value`.
pub fn char_width(value: &str) -> usize {
    value.graphemes(true).count()
}

/// The printable projection of one record, one field per [`Column`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    fields: [DisplayField; Column::COUNT],
}

impl DisplayRecord {
    pub fn from_annotation(annotation: &Annotation) -> Self {
        let importance = if annotation.importance() > 0 {
            EMPHASIS.to_string()
        } else {
            String::new()
        };
        let date = annotation
            .date()
            .map(ToString::to_string)
            .unwrap_or_default();
        Self::from_values(|column| match column {
            Column::Importance => importance.clone(),
            Column::User => annotation.user().unwrap_or_default().to_owned(),
            Column::Date => date.clone(),
            Column::Text => annotation.text().to_owned(),
            Column::File => annotation.source_file().to_owned(),
        })
    }

    pub fn header() -> Self {
        Self::from_values(|column| column.header().to_owned())
    }

    pub fn field(&self, column: Column) -> &DisplayField {
        &self.fields[column.index()]
    }

    fn from_values(mut value: impl FnMut(Column) -> String) -> Self {
        let mut fields: [DisplayField; Column::COUNT] = Default::default();
        for column in Column::iter() {
            fields[column.index()] = DisplayField::fit(&value(column), column.max_width());
        }
        Self { fields }
    }
}
