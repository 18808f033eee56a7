//! Project roots file
//!
//! One root directory per line. Blank lines and `#` comments are ignored,
//! and a leading `~/` expands to the home directory.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::debug;

/// Read a roots file, `None` if it cannot be read
pub fn read_roots_file(path: &Path) -> Option<Vec<PathBuf>> {
    let content = std::fs::read_to_string(path).ok()?;
    let home = BaseDirs::new().map(|d| d.home_dir().to_path_buf());
    let roots = parse_roots(&content, home.as_deref());
    debug!("Read {} roots from {:?}", roots.len(), path);
    Some(roots)
}

/// Parse roots file content
pub fn parse_roots(content: &str, home: Option<&Path>) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| expand_home(line, home))
        .collect()
}

fn expand_home(line: &str, home: Option<&Path>) -> PathBuf {
    match (line.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if line == "~" => home.map_or_else(|| PathBuf::from(line), Path::to_path_buf),
        _ => PathBuf::from(line),
    }
}
