//! Java Compiler Discovery

use std::path::{Path, PathBuf};
use tracing::debug;
use which::which;

use crate::ToolchainError;

/// A `javac` binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaCompiler {
    path: PathBuf,
}

impl JavaCompiler {
    /// Use `explicit` if given, otherwise find `javac` on `PATH`
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ToolchainError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ToolchainError::CompilerNotFound(format!(
                    "{:?} is not a file",
                    path
                )));
            }
            return Ok(Self::new(path.to_path_buf()));
        }

        let path = which("javac")
            .map_err(|e| ToolchainError::CompilerNotFound(format!("javac not on PATH: {}", e)))?;
        debug!("Using javac at {:?}", path);
        Ok(Self::new(path))
    }

    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
