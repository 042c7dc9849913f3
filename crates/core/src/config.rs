//! Generator Configuration
//!
//! Every environment-specific assumption of the generator lives here:
//! - where the Java sources are and which language level they target
//! - which toolchain binaries to run
//! - how the generated file is laid out

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{info, debug};

use crate::error::{ConfigError, Result};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "gendex.toml";

/// Width of a single literal chunk in the generated file
pub const DEFAULT_CHUNK_WIDTH: usize = 70;

/// Language level the glue classes are compiled for. Kept at 1.8 so the
/// output still loads on the oldest supported Android runtime.
pub const DEFAULT_JAVA_RELEASE: &str = "1.8";

const DEFAULT_LICENSE_HEADER: &str = "\
// Copyright 2015 The Go Authors.  All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.";

/// DEX linker selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkerKind {
    /// Use `dx` when the build-tools ship it, `d8` otherwise
    #[default]
    Auto,
    /// Legacy `dx --dex`
    Dx,
    /// `d8` from build-tools 28 onwards
    D8,
}

impl LinkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkerKind::Auto => "auto",
            LinkerKind::Dx => "dx",
            LinkerKind::D8 => "d8",
        }
    }
}

/// Layout of the generated source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmitConfig {
    /// License block placed at the very top
    pub license_header: String,
    /// Name shown in the "Code generated by" marker
    pub generator: String,
    /// Package clause of the generated file
    pub package: String,
    /// Variable holding the encoded payload
    pub variable: String,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            license_header: DEFAULT_LICENSE_HEADER.to_string(),
            generator: "gendex".to_string(),
            package: "main".to_string(),
            variable: "dexStr".to_string(),
        }
    }
}

/// Generator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GendexConfig {
    /// Directory holding the Java sources
    pub source_dir: PathBuf,
    /// Glob matched inside `source_dir`
    pub source_pattern: String,
    /// Passed as both `-source` and `-target`
    pub java_release: String,
    /// Package directory pre-created below `work/`
    pub package_path: PathBuf,
    /// Explicit Java compiler, `javac` from `PATH` otherwise
    pub javac: Option<PathBuf>,
    /// DEX linker selection
    pub linker: LinkerKind,
    /// Explicit SDK root, bypasses SDK discovery
    pub sdk_root: Option<PathBuf>,
    /// Parent of the temporary workspace, system temp dir otherwise
    pub temp_dir: Option<PathBuf>,
    /// Formatter command fed on stdin. Empty disables formatting.
    pub formatter: Vec<String>,
    /// Literal chunk width
    pub chunk_width: usize,
    /// Generated file layout
    pub emit: EmitConfig,
}

impl Default for GendexConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("../../app"),
            source_pattern: "*.java".to_string(),
            java_release: DEFAULT_JAVA_RELEASE.to_string(),
            package_path: PathBuf::from("org/golang/app"),
            javac: None,
            linker: LinkerKind::Auto,
            sdk_root: None,
            temp_dir: None,
            formatter: vec!["gofmt".to_string()],
            chunk_width: DEFAULT_CHUNK_WIDTH,
            emit: EmitConfig::default(),
        }
    }
}

impl GendexConfig {
    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GendexConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load `gendex.toml` from `dir` if present, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            info!("Using configuration {:?}", path);
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_width == 0 {
            return Err(ConfigError::Invalid("chunk_width must be positive".into()));
        }
        if self.java_release.trim().is_empty() {
            return Err(ConfigError::Invalid("java_release must not be empty".into()));
        }
        if self.source_pattern.is_empty() {
            return Err(ConfigError::Invalid("source_pattern must not be empty".into()));
        }
        if self.package_path.is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "package_path must be relative, got {:?}",
                self.package_path
            )));
        }
        if self.emit.variable.is_empty() || self.emit.package.is_empty() {
            return Err(ConfigError::Invalid("emit.package and emit.variable must be set".into()));
        }
        Ok(())
    }
}
