//! Content loader - reads content files from disk for the CLI.
//!
//! Loading is the only fallible step in the pipeline; once a file's text
//! is in memory, rendering never fails.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Error raised while loading content files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read a single content file as UTF-8 text.
pub fn load_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Collect all Markdown files under a directory, sorted by path.
pub fn find_content_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file() && is_markdown_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn is_markdown_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md") | Some("markdown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_content_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "# A").unwrap();
        fs::write(dir.path().join("b.markdown"), "# B").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/c.md"), "# C").unwrap();

        let files = find_content_files(dir.path());
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|p| is_markdown_file(p)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file(Path::new("/no/such/file.md")).unwrap_err();
        assert!(err.to_string().contains("/no/such/file.md"));
    }

    #[test]
    fn test_load_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.md");
        fs::write(&path, "---\ntitle: T\n---\nbody").unwrap();
        assert_eq!(load_file(&path).unwrap(), "---\ntitle: T\n---\nbody");
    }
}
