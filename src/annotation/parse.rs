use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::{parse_partial_date, Annotation, EMPHASIS, FIELD_SEPARATOR};

static MARKER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)//[ \t]?todo[ \t:;]").expect("valid marker prefix regex"));

/// Why a TODO comment produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("comment does not start with a todo marker")]
    MissingMarker,
    #[error("expected 1 or 3 fields separated by `;`, found {0}")]
    FieldCount(usize),
    #[error("`{0}` is not a YYYY, YYYY-MM or YYYY-MM-DD date")]
    InvalidDate(String),
}

/// Turns one raw comment into a record.
///
/// The body after the marker is either free text, or `user; date; text` where
/// the user and the date may be left empty. Any other number of fields is an
/// error, as is a date that is neither `YYYY`, `YYYY-MM` nor `YYYY-MM-DD`.
pub fn parse_annotation(raw: &str, source_file: &str) -> Result<Annotation, AnnotationError> {
    let prefix = MARKER_PREFIX
        .find(raw)
        .ok_or(AnnotationError::MissingMarker)?;
    let body = &raw[prefix.end()..];
    let importance = raw.chars().filter(|&ch| ch == EMPHASIS).count();

    if body.trim().is_empty() {
        return Err(AnnotationError::FieldCount(0));
    }
    let fields: Vec<&str> = body.split(FIELD_SEPARATOR).map(str::trim).collect();
    match fields.as_slice() {
        [text] => Ok(Annotation::new(
            source_file,
            importance,
            None,
            None,
            strip_emphasis(text),
        )),
        [user, date, text] => {
            let user = (!user.is_empty()).then(|| (*user).to_owned());
            let date = if date.is_empty() {
                None
            } else {
                let parsed = parse_partial_date(date)
                    .ok_or_else(|| AnnotationError::InvalidDate((*date).to_owned()))?;
                Some(parsed)
            };
            Ok(Annotation::new(
                source_file,
                importance,
                user,
                date,
                strip_emphasis(text),
            ))
        }
        other => Err(AnnotationError::FieldCount(other.len())),
    }
}

// Emphasis at the end of the text counts towards importance, not the text.
fn strip_emphasis(text: &str) -> &str {
    text.trim_end_matches(EMPHASIS).trim_end()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn single_field_is_free_text() {
        let todo = parse_annotation("// TODO you can do it", "a.js").expect("parses");
        assert_eq!(todo.user(), None);
        assert_eq!(todo.date(), None);
        assert_eq!(todo.text(), "you can do it");
        assert_eq!(todo.importance(), 0);
        assert_eq!(todo.source_file(), "a.js");
    }

    #[test]
    fn single_field_is_trimmed() {
        let todo = parse_annotation("//todo:   spaced out   ", "a.js").expect("parses");
        assert_eq!(todo.text(), "spaced out");
    }

    #[test]
    fn three_fields_with_all_parts() {
        let todo = parse_annotation("//toDo:Alex;2020-10;add writeLine!!!", "a.js").expect("parses");
        assert_eq!(todo.user(), Some("Alex"));
        let date = todo.date().expect("date");
        assert_eq!((date.year(), date.month(), date.day()), (2020, Some(10), None));
        assert_eq!(todo.text(), "add writeLine");
        assert_eq!(todo.importance(), 3);
    }

    #[test]
    fn empty_user_is_absent_not_empty() {
        let todo = parse_annotation("// todo ;2016;add x", "a.js").expect("parses");
        assert_eq!(todo.user(), None);
        let date = todo.date().expect("date");
        assert_eq!((date.year(), date.month(), date.day()), (2016, None, None));
        assert_eq!(todo.text(), "add x");
    }

    #[test]
    fn empty_user_and_date_are_absent() {
        let todo = parse_annotation("// TODO ; ; add writeLine!", "a.js").expect("parses");
        assert_eq!(todo.user(), None);
        assert_eq!(todo.date(), None);
        assert_eq!(todo.text(), "add writeLine");
        assert_eq!(todo.importance(), 1);
    }

    #[test]
    fn importance_counts_every_marker() {
        let todo = parse_annotation("// todo wow! such! urgency!!", "a.js").expect("parses");
        assert_eq!(todo.importance(), 4);
        assert_eq!(todo.text(), "wow! such! urgency");
    }

    #[test]
    fn wrong_field_counts_are_rejected() {
        assert_matches!(
            parse_annotation("// todo a;b", "a.js"),
            Err(AnnotationError::FieldCount(2))
        );
        assert_matches!(
            parse_annotation("// todo a;2020;c;d", "a.js"),
            Err(AnnotationError::FieldCount(4))
        );
        assert_matches!(
            parse_annotation("// todo    ", "a.js"),
            Err(AnnotationError::FieldCount(0))
        );
    }

    #[test]
    fn malformed_date_rejects_the_comment() {
        assert_matches!(
            parse_annotation("// todo Bob;next week;ship it", "a.js"),
            Err(AnnotationError::InvalidDate(token)) if token == "next week"
        );
    }

    #[test]
    fn raw_without_marker_is_rejected() {
        assert_matches!(
            parse_annotation("just text", "a.js"),
            Err(AnnotationError::MissingMarker)
        );
    }
}
