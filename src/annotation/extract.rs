use once_cell::sync::Lazy;
use regex::Regex;

use super::SourceFile;

// `//`, at most one blank, the marker, then a blank, `:` or `;` and the rest of
// the line. Blanks are spelled out so a match never crosses a newline.
static TODO_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)//[ \t]?todo[ \t:;].+").expect("valid todo comment regex")
});

/// A TODO comment as it appeared in the file, from `//` to the end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawAnnotation<'a> {
    pub source_file: &'a str,
    pub raw: &'a str,
}

/// Finds every TODO comment in `file`, in file order.
pub fn extract(file: &SourceFile) -> Vec<RawAnnotation<'_>> {
    TODO_COMMENT
        .find_iter(&file.content)
        .map(|m| RawAnnotation {
            source_file: &file.name,
            raw: m.as_str().trim_end_matches('\r'),
        })
        .collect()
}
