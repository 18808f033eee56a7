//! Project directory discovery

use std::path::{Path, PathBuf};

use tracing::debug;

/// Visible subdirectories of every existing root, sorted
pub fn list_project_dirs(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = roots
        .iter()
        .filter(|root| root.is_dir())
        .flat_map(|root| children(root))
        .collect();
    dirs.sort();
    dirs.dedup();
    debug!("Found {} project directories", dirs.len());
    dirs
}

fn children(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect()
}
