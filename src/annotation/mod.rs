//! TODO comment model and the pipeline that builds it from file contents.
//!
//! The pipeline runs once per process: every [`SourceFile`] is scanned by the
//! extractor, each raw comment goes through the parser, and the survivors are
//! frozen into an [`Annotations`] set that later commands only read from.

pub mod date;
pub mod extract;
pub mod parse;

pub use date::{parse_partial_date, PartialDate};
pub use extract::{extract, RawAnnotation};
pub use parse::{parse_annotation, AnnotationError};

/// Word that opens a TODO comment, matched case-insensitively after `//`.
pub const MARKER: &str = "todo";
/// Separates `user; date; text` in the structured form.
pub const FIELD_SEPARATOR: char = ';';
/// Every occurrence in the raw comment adds one point of importance.
pub const EMPHASIS: char = '!';
/// Separates year, month and day in a date token.
pub const DATE_SEPARATOR: char = '-';

/// One file handed to the pipeline: its display name and full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    source_file: String,
    importance: usize,
    user: Option<String>,
    date: Option<PartialDate>,
    text: String,
}

impl Annotation {
    pub fn new(
        source_file: impl Into<String>,
        importance: usize,
        user: Option<String>,
        date: Option<PartialDate>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            importance,
            user,
            date,
            text: text.into(),
        }
    }

    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Number of emphasis markers in the raw comment; zero means not important.
    pub fn importance(&self) -> usize {
        self.importance
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn date(&self) -> Option<&PartialDate> {
        self.date.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The read-only record set built at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    items: Vec<Annotation>,
}

impl Annotations {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Annotation> {
        self.items.iter()
    }

    /// Borrowed view in extraction order, the starting point for every query.
    pub fn view(&self) -> Vec<&Annotation> {
        self.items.iter().collect()
    }
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Annotations {
    type Item = &'a Annotation;
    type IntoIter = std::slice::Iter<'a, Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Extracts and parses every file in the order given. Comments that do not
/// fit one of the accepted shapes are dropped without affecting the rest.
pub fn build_annotations(files: &[SourceFile]) -> Annotations {
    let mut dropped = 0usize;
    let annotations: Annotations = files
        .iter()
        .flat_map(extract)
        .filter_map(|raw| match parse_annotation(raw.raw, raw.source_file) {
            Ok(annotation) => Some(annotation),
            Err(err) => {
                dropped += 1;
                tracing::debug!(file = raw.source_file, comment = raw.raw, %err, "dropping todo comment");
                None
            }
        })
        .collect();
    if dropped > 0 {
        tracing::debug!(dropped, kept = annotations.len(), "some todo comments were ignored");
    }
    annotations
}
