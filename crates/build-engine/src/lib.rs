//! DEX Generation Engine
//!
//! Compiles the Java glue sources, links them into a DEX file and embeds
//! the result as a base64 literal in a generated source file.

pub mod workspace;
pub mod sources;
pub mod process;
pub mod javac;
pub mod dex;
pub mod emit;
pub mod runner;

pub use workspace::Workspace;
pub use sources::find_sources;
pub use process::{Invocation, SystemRunner, ToolOutput, ToolRunner};
pub use javac::CompileQuery;
pub use dex::{LinkQuery, Linker};
pub use emit::Emitter;
pub use runner::{GenerationReport, Pipeline, Stage};

use std::path::PathBuf;

use gendex_android_toolchain::ToolchainError;

/// Build errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
    #[error("Workspace error: {0}")]
    Workspace(#[source] std::io::Error),
    #[error("Invalid source pattern {pattern:?}: {source}")]
    InvalidSourcePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Could not find {0} files")]
    NoSourceFilesFound(String),
    #[error("Execution of {tool} could not commence: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Java compiler failed ({status})")]
    CompileFailed {
        command: String,
        status: String,
        output: String,
    },
    #[error("DEX linker failed ({status})")]
    LinkFailed {
        command: String,
        status: String,
        output: String,
    },
    #[error("Cannot read DEX artifact {path:?}: {source}")]
    ReadArtifactFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Formatting generated source failed: {reason}")]
    FormatFailed { reason: String, raw: String },
    #[error("Cannot write {path:?}: {source}")]
    WriteOutputFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Text a human needs to diagnose the failure: the failed command line
    /// and its output, or the source that could not be formatted.
    pub fn diagnostics(&self) -> Option<String> {
        match self {
            BuildError::CompileFailed { command, output, .. }
            | BuildError::LinkFailed { command, output, .. } => {
                Some(format!("{}\n{}", command, output))
            }
            BuildError::FormatFailed { raw, .. } => Some(raw.clone()),
            _ => None,
        }
    }
}
