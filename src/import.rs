use crate::models::Highlight;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const CLIPPINGS_FILE_NAME: &str = "My Clippings.txt";

pub fn filter_by_date(
    highlights: Vec<Highlight>,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<Highlight> {
    highlights
        .into_iter()
        .filter(|h| {
            let date = h.metadata.date.date();
            date >= from && date <= to
        })
        .collect()
}

/// A file path is returned as is; a directory (e.g. the mounted device) is
/// searched for clippings files.
pub fn find_clippings_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .file_name()
                .map(|n| n.to_string_lossy() == CLIPPINGS_FILE_NAME)
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}
