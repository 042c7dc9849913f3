//! Android Toolchain Discovery
//!
//! Resolves what the DEX generator needs from the host:
//! - the Android SDK root
//! - the newest installed platform and build-tools
//! - the Java compiler

pub mod detector;
pub mod sdk;
pub mod jdk;

use std::path::PathBuf;

pub use detector::{SdkLocator, EnvSdkLocator, FixedSdkLocator, ANDROID_HOME_VAR};
pub use sdk::{newest_child, Sdk, Platform, BuildTools};
pub use jdk::JavaCompiler;

/// Toolchain discovery errors
#[derive(Debug, thiserror::Error)]
pub enum ToolchainError {
    #[error("Couldn't find Android SDK: {0}")]
    SdkNotFound(String),
    #[error("No installed versions in {0:?}")]
    EmptyVersionDirectory(PathBuf),
    #[error("Cannot list {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Android SDK lacks {component} at {path:?}")]
    MissingComponent {
        component: &'static str,
        path: PathBuf,
    },
    #[error("Java compiler not found: {0}")]
    CompilerNotFound(String),
}
