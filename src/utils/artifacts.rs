//! Artifact directory bookkeeping.
//!
//! The delegate writes compilation artifacts (subgraphs, calibration stats,
//! visualization files) into a directory this crate owns the lifecycle of but
//! never interprets. The single invariant: the directory exists and is empty
//! before compilation starts.

use crate::core::errors::OffloadResult;
use std::path::{Path, PathBuf};
use tracing::info;

/// A filesystem location receiving delegate-written artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactDir {
    root: PathBuf,
}

impl ArtifactDir {
    /// Wraps the given directory path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Clears and recreates the directory.
    ///
    /// Idempotent: an existing directory is removed with its contents, then
    /// recreated empty.
    pub fn prepare(&self) -> OffloadResult<()> {
        if self.root.exists() {
            std::fs::remove_dir_all(&self.root)?;
        }
        std::fs::create_dir_all(&self.root)?;
        info!(dir = %self.root.display(), "artifact directory ready");
        Ok(())
    }

    /// Lists the artifacts currently present, in name order.
    ///
    /// Contents are opaque; this exists purely for display.
    pub fn entries(&self) -> OffloadResult<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            entries.push(entry?.path());
        }
        entries.sort();
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_creates_missing_directory() {
        let base = tempfile::tempdir().unwrap();
        let dir = ArtifactDir::new(base.path().join("artifacts"));

        dir.prepare().unwrap();
        assert!(dir.path().is_dir());
        assert!(dir.entries().unwrap().is_empty());
    }

    #[test]
    fn test_prepare_empties_existing_directory() {
        let base = tempfile::tempdir().unwrap();
        let dir = ArtifactDir::new(base.path().join("artifacts"));
        dir.prepare().unwrap();
        std::fs::write(dir.path().join("subgraph_0.bin"), b"stale").unwrap();

        dir.prepare().unwrap();
        assert!(dir.entries().unwrap().is_empty());
    }

    #[test]
    fn test_entries_sorted() {
        let base = tempfile::tempdir().unwrap();
        let dir = ArtifactDir::new(base.path().join("artifacts"));
        dir.prepare().unwrap();
        std::fs::write(dir.path().join("b.bin"), b"").unwrap();
        std::fs::write(dir.path().join("a.bin"), b"").unwrap();

        let names: Vec<_> = dir
            .entries()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.bin", "b.bin"]);
    }
}
