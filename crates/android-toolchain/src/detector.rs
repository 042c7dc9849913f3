//! SDK Root Detection
//!
//! Finds the Android SDK root. `ANDROID_HOME` wins when set; otherwise the
//! platform's default install location is probed.

use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{info, debug};

use crate::ToolchainError;

/// Environment variable overriding SDK discovery
pub const ANDROID_HOME_VAR: &str = "ANDROID_HOME";

/// Something that can name the Android SDK root
pub trait SdkLocator {
    fn locate_sdk_root(&self) -> Result<PathBuf, ToolchainError>;
}

/// Locator backed by `ANDROID_HOME` and default install locations
#[derive(Debug, Clone)]
pub struct EnvSdkLocator {
    android_home: Option<OsString>,
    candidates: Vec<PathBuf>,
}

impl EnvSdkLocator {
    /// Capture `ANDROID_HOME` and the default candidates of this host
    pub fn from_env() -> Self {
        Self::new(std::env::var_os(ANDROID_HOME_VAR), Self::default_candidates())
    }

    pub fn new(android_home: Option<OsString>, candidates: Vec<PathBuf>) -> Self {
        Self {
            android_home: android_home.filter(|v| !v.is_empty()),
            candidates,
        }
    }

    /// Default SDK locations, in probing order
    pub fn default_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if cfg!(windows) {
            if let Some(local) = dirs::data_local_dir() {
                candidates.push(local.join("Android").join("Sdk"));
            }
        } else if cfg!(target_os = "macos") {
            if let Some(home) = dirs::home_dir() {
                candidates.push(home.join("Library").join("Android").join("sdk"));
            }
        } else if let Some(home) = dirs::home_dir() {
            candidates.push(home.join("Android").join("Sdk"));
        }

        candidates
    }
}

impl SdkLocator for EnvSdkLocator {
    fn locate_sdk_root(&self) -> Result<PathBuf, ToolchainError> {
        if let Some(ref android_home) = self.android_home {
            let path = PathBuf::from(android_home);
            if !path.is_dir() {
                return Err(ToolchainError::SdkNotFound(format!(
                    "{} points to {:?}, which is not a directory",
                    ANDROID_HOME_VAR, path
                )));
            }
            info!("Using Android SDK from {}: {:?}", ANDROID_HOME_VAR, path);
            return Ok(path);
        }

        for path in &self.candidates {
            debug!("Probing {:?}", path);
            if path.is_dir() {
                info!("Found Android SDK at {:?}", path);
                return Ok(path.clone());
            }
        }

        Err(ToolchainError::SdkNotFound(format!(
            "{} is not set and no SDK at {:?}",
            ANDROID_HOME_VAR, self.candidates
        )))
    }
}

/// Locator for an SDK root that is already known
#[derive(Debug, Clone)]
pub struct FixedSdkLocator(pub PathBuf);

impl SdkLocator for FixedSdkLocator {
    fn locate_sdk_root(&self) -> Result<PathBuf, ToolchainError> {
        if self.0.is_dir() {
            Ok(self.0.clone())
        } else {
            Err(ToolchainError::SdkNotFound(format!("{:?} is not a directory", self.0)))
        }
    }
}
