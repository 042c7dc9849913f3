//! SDK Layout
//!
//! Picks the platform and build-tools to use out of an SDK root.
//!
//! "Newest" is whichever child directory name sorts last, byte by byte. This
//! is a heuristic, not version comparison: `android-9` sorts after
//! `android-34`, and `9.0.0` after `34.0.0`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ToolchainError;

/// Return the child of `parent` whose name sorts last
pub fn newest_child(parent: &Path) -> Result<PathBuf, ToolchainError> {
    let unreadable = |source| ToolchainError::Unreadable {
        path: parent.to_path_buf(),
        source,
    };

    let mut newest: Option<OsString> = None;
    for entry in std::fs::read_dir(parent).map_err(unreadable)? {
        let name = entry.map_err(unreadable)?.file_name();
        if newest.as_ref().map_or(true, |current| name > *current) {
            newest = Some(name);
        }
    }

    newest
        .map(|name| parent.join(name))
        .ok_or_else(|| ToolchainError::EmptyVersionDirectory(parent.to_path_buf()))
}

/// Android SDK rooted at a directory
#[derive(Debug, Clone)]
pub struct Sdk {
    root: PathBuf,
}

/// One installed `platforms/<version>` directory
#[derive(Debug, Clone)]
pub struct Platform {
    path: PathBuf,
}

/// One installed `build-tools/<version>` directory
#[derive(Debug, Clone)]
pub struct BuildTools {
    path: PathBuf,
}

impl Sdk {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Newest installed platform. Its `android.jar` must exist.
    pub fn platform(&self) -> Result<Platform, ToolchainError> {
        let platform = Platform {
            path: newest_child(&self.root.join("platforms"))?,
        };
        debug!("Selected platform {:?}", platform.path);

        let jar = platform.android_jar();
        if !jar.is_file() {
            return Err(ToolchainError::MissingComponent {
                component: "android.jar",
                path: jar,
            });
        }
        Ok(platform)
    }

    /// Newest installed build-tools
    pub fn build_tools(&self) -> Result<BuildTools, ToolchainError> {
        let build_tools = BuildTools {
            path: newest_child(&self.root.join("build-tools"))?,
        };
        debug!("Selected build-tools {:?}", build_tools.path);
        Ok(build_tools)
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

impl Platform {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name, e.g. `android-34`
    pub fn version(&self) -> String {
        dir_name(&self.path)
    }

    /// Boot classpath for compiling against this platform
    pub fn android_jar(&self) -> PathBuf {
        self.path.join("android.jar")
    }
}

impl BuildTools {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name, e.g. `34.0.0`
    pub fn version(&self) -> String {
        dir_name(&self.path)
    }

    /// Path to the legacy `dx` linker
    pub fn dx(&self) -> PathBuf {
        if cfg!(windows) {
            self.path.join("dx.bat")
        } else {
            self.path.join("dx")
        }
    }

    /// Path to the `d8` linker
    pub fn d8(&self) -> PathBuf {
        if cfg!(windows) {
            self.path.join("d8.bat")
        } else {
            self.path.join("d8")
        }
    }

    /// Build-tools 31 and later no longer ship `dx`
    pub fn has_dx(&self) -> bool {
        self.dx().is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_newest_child_is_lexicographic_max() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["android-28", "android-34", "android-9", "android-30"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        assert_eq!(newest_child(dir.path()).unwrap(), dir.path().join("android-9"));
    }

    #[test]
    fn test_newest_child_counts_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("30.0.3")).unwrap();
        fs::write(dir.path().join("34.0.0"), b"").unwrap();
        assert_eq!(newest_child(dir.path()).unwrap(), dir.path().join("34.0.0"));
    }

    #[test]
    fn test_newest_child_empty_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            newest_child(dir.path()),
            Err(ToolchainError::EmptyVersionDirectory(ref p)) if p == dir.path()
        ));
        assert!(matches!(
            newest_child(&dir.path().join("missing")),
            Err(ToolchainError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_sdk_components() {
        let dir = tempfile::tempdir().unwrap();
        let platform = dir.path().join("platforms").join("android-34");
        let tools = dir.path().join("build-tools").join("30.0.3");
        fs::create_dir_all(&platform).unwrap();
        fs::create_dir_all(&tools).unwrap();

        let sdk = Sdk::new(dir.path().to_path_buf());
        assert!(matches!(
            sdk.platform(),
            Err(ToolchainError::MissingComponent { component: "android.jar", .. })
        ));

        fs::write(platform.join("android.jar"), b"").unwrap();
        let platform = sdk.platform().unwrap();
        assert_eq!(platform.version(), "android-34");

        let tools = sdk.build_tools().unwrap();
        assert_eq!(tools.version(), "30.0.3");
        assert!(!tools.has_dx());
        fs::write(tools.dx(), b"").unwrap();
        assert!(tools.has_dx());
    }
}
