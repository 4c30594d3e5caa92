//! Finds deck files anywhere below a root directory.
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DECK_EXTENSION: &str = ".flashcard";

/// Returns every regular file under `root` whose name ends with `suffix`
/// (case-sensitive), sorted by path. Unreadable entries are logged and skipped.
///
/// Symlinks are followed, so one file may be reachable by several paths; only
/// the first path (in sorted order) for each real file is kept.
pub fn discover_deck_files(root: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(suffix))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();

    let mut seen = HashSet::new();
    files.retain(|path| match std::fs::canonicalize(path) {
        Ok(real) => seen.insert(real),
        Err(_) => true,
    });
    files
}
