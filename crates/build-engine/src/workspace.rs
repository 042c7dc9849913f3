//! Build Workspace
//!
//! A private temporary directory holding the compiled classes and the DEX
//! file. It is removed exactly once: explicitly through [`Workspace::release`],
//! or on drop if a caller bails out early.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

use crate::BuildError;

/// Temporary directory owned by one generator run
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh `gendex-*` directory below `parent` (system temp dir
    /// if `None`), with `work/<package_path>` already in place.
    pub fn acquire(parent: Option<&Path>, package_path: &Path) -> Result<Self, BuildError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("gendex-");

        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(BuildError::Workspace)?;

        let workspace = Self { dir };
        std::fs::create_dir_all(workspace.work_dir().join(package_path))
            .map_err(BuildError::Workspace)?;

        debug!("Acquired workspace {:?}", workspace.path());
        Ok(workspace)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Class output directory handed to the compiler
    pub fn work_dir(&self) -> PathBuf {
        self.path().join("work")
    }

    /// Where the linker writes the DEX file
    pub fn dex_path(&self) -> PathBuf {
        self.path().join("classes.dex")
    }

    /// Delete the whole tree
    pub fn release(self) -> Result<(), BuildError> {
        let path = self.path().to_path_buf();
        self.dir.close().map_err(BuildError::Workspace)?;
        debug!("Released workspace {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_release() {
        let parent = tempfile::tempdir().unwrap();
        let workspace = Workspace::acquire(Some(parent.path()), Path::new("org/golang/app")).unwrap();

        let path = workspace.path().to_path_buf();
        assert!(path.starts_with(parent.path()));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("gendex-"));
        assert!(workspace.work_dir().join("org/golang/app").is_dir());
        assert_eq!(workspace.dex_path(), path.join("classes.dex"));

        workspace.release().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_removes_tree() {
        let parent = tempfile::tempdir().unwrap();
        let path = {
            let workspace = Workspace::acquire(Some(parent.path()), Path::new("a")).unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_acquire_in_missing_parent() {
        let parent = tempfile::tempdir().unwrap();
        let missing = parent.path().join("missing");
        assert!(matches!(
            Workspace::acquire(Some(&missing), Path::new("a")),
            Err(BuildError::Workspace(_))
        ));
    }
}
