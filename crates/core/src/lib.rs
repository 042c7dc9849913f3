//! gendex Core - configuration and shared types
//!
//! Holds the generator configuration that the toolchain discovery and the
//! build pipeline are parameterised with.

pub mod config;
pub mod error;

pub use config::{EmitConfig, GendexConfig, LinkerKind, CONFIG_FILE_NAME};
pub use error::{ConfigError, Result};
