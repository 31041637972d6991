//! Loads the files a report is built from.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use crate::annotation::SourceFile;
use crate::config::ScanOptions;

/// Every file under `root` with the configured extension, sorted by path
/// within each directory so repeated scans agree.
pub fn discover(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !(options.skip_hidden && is_hidden(entry)));
    for entry in walker {
        let entry = entry.with_context(|| format!("scanning {}", root.display()))?;
        if entry.file_type().is_file() && has_extension(entry.path(), &options.extension) {
            paths.push(entry.into_path());
        }
    }
    tracing::debug!(root = %root.display(), count = paths.len(), "discovered source files");
    Ok(paths)
}

/// Reads one file. Bytes that are not UTF-8 are replaced rather than rejected.
pub fn read_source(path: &Path) -> Result<SourceFile> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SourceFile::new(
        name,
        String::from_utf8_lossy(&bytes).into_owned(),
    ))
}

/// Discovers and reads everything in one pass.
pub fn collect(root: &Path, options: &ScanOptions) -> Result<Vec<SourceFile>> {
    discover(root, options)?
        .iter()
        .map(|path| read_source(path))
        .collect()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
