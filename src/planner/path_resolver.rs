//! # Path Resolution Module
//!
//! Centralizza il calcolo dei path di destinazione e la creazione delle
//! cartelle dell'albero specchiato.

use crate::error::{Result, TranscodeError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maps directories of the source tree onto the destination tree
#[derive(Debug, Clone)]
pub struct PathResolver {
    source_root: PathBuf,
    destination_root: PathBuf,
}

impl PathResolver {
    /// Canonicalizza le radici, creando la destinazione se manca
    pub fn new(source_root: &Path, destination_root: &Path) -> Result<Self> {
        let source_root = source_root.canonicalize().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TranscodeError::PathNotFound(source_root.to_path_buf()),
            _ => TranscodeError::Io(e),
        })?;
        if !source_root.is_dir() {
            return Err(TranscodeError::NotADirectory(source_root));
        }

        Self::ensure_dir(destination_root)?;
        let destination_root = destination_root.canonicalize()?;

        debug!("Canonical source: {}", source_root.display());
        debug!("Canonical destination: {}", destination_root.display());

        Ok(Self {
            source_root,
            destination_root,
        })
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn destination_root(&self) -> &Path {
        &self.destination_root
    }

    /// Destination directory mirroring `source_dir`
    pub fn destination_dir(&self, source_dir: &Path) -> PathBuf {
        match source_dir.strip_prefix(&self.source_root) {
            Ok(relative) => self.destination_root.join(relative),
            Err(_) => {
                debug!("[WARN] {} is outside the source root", source_dir.display());
                self.destination_root.clone()
            }
        }
    }

    /// Whether the destination tree lives inside the source tree
    pub fn destination_is_nested(&self) -> bool {
        self.destination_root != self.source_root
            && self.destination_root.starts_with(&self.source_root)
    }

    /// Crea la directory e tutti gli antenati mancanti
    pub fn ensure_dir(path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|source| TranscodeError::DirectoryCreateFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mirrors_relative_directories() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        std::fs::create_dir_all(source.join("a/b")).unwrap();

        let resolver = PathResolver::new(&source, &temp_dir.path().join("dst")).unwrap();
        let root = temp_dir.path().canonicalize().unwrap();

        assert_eq!(
            resolver.destination_dir(&resolver.source_root().join("a/b")),
            root.join("dst/a/b")
        );
        assert_eq!(resolver.destination_dir(resolver.source_root()), root.join("dst"));
        assert!(root.join("dst").is_dir());
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("x/y/z");
        PathResolver::ensure_dir(&nested).unwrap();
        PathResolver::ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_ensure_dir_fails_on_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("blocker");
        std::fs::write(&file, b"x").unwrap();

        let err = PathResolver::ensure_dir(&file.join("child")).unwrap_err();
        assert!(matches!(err, TranscodeError::DirectoryCreateFailed { .. }));
    }

    #[test]
    fn test_missing_source_root() {
        let temp_dir = TempDir::new().unwrap();
        let err = PathResolver::new(&temp_dir.path().join("nope"), &temp_dir.path().join("dst"))
            .unwrap_err();
        assert!(matches!(err, TranscodeError::PathNotFound(_)));
    }

    #[test]
    fn test_detects_nested_destination() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(temp_dir.path(), &temp_dir.path().join("out")).unwrap();
        assert!(resolver.destination_is_nested());

        let sibling = TempDir::new().unwrap();
        let resolver = PathResolver::new(temp_dir.path(), sibling.path()).unwrap();
        assert!(!resolver.destination_is_nested());
    }
}
