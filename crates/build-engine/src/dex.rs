//! DEX Linking
//!
//! Turns the compiled class tree into a single DEX file, with either the
//! legacy `dx` tool or its successor `d8`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, debug};
use walkdir::WalkDir;

use gendex_android_toolchain::{BuildTools, Platform};
use gendex_core::LinkerKind;

use crate::process::{Invocation, ToolRunner};
use crate::BuildError;

/// Name `d8` gives its output inside `--output`
const D8_OUTPUT_NAME: &str = "classes.dex";

/// The linker binary and what it needs besides the classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Linker {
    Dx { path: PathBuf },
    D8 { path: PathBuf, android_jar: PathBuf },
}

impl Linker {
    /// Resolve `kind` against the installed build-tools
    pub fn select(kind: LinkerKind, build_tools: &BuildTools, platform: &Platform) -> Self {
        let d8 = || Linker::D8 {
            path: build_tools.d8(),
            android_jar: platform.android_jar(),
        };

        match kind {
            LinkerKind::Dx => Linker::Dx { path: build_tools.dx() },
            LinkerKind::D8 => d8(),
            LinkerKind::Auto if build_tools.has_dx() => Linker::Dx { path: build_tools.dx() },
            LinkerKind::Auto => d8(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Linker::Dx { .. } => "dx",
            Linker::D8 { .. } => "d8",
        }
    }
}

/// Parameters of one link run
#[derive(Debug, Clone)]
pub struct LinkQuery<'a> {
    pub linker: &'a Linker,
    /// Root of the compiled class tree
    pub class_dir: &'a Path,
    /// DEX file to produce
    pub output_dex: &'a Path,
}

impl LinkQuery<'_> {
    pub fn invocation(&self) -> Result<Invocation, BuildError> {
        match self.linker {
            Linker::Dx { path } => {
                let mut output = OsString::from("--output=");
                output.push(self.output_dex);
                Ok(Invocation::new(path)
                    .arg("--dex")
                    .arg(output)
                    .arg(self.class_dir))
            }
            Linker::D8 { path, android_jar } => {
                let classes = self.class_files();
                if classes.is_empty() {
                    return Err(BuildError::LinkFailed {
                        command: path.to_string_lossy().to_string(),
                        status: "not started".to_string(),
                        output: format!("no class files under {:?}", self.class_dir),
                    });
                }
                Ok(Invocation::new(path)
                    .arg("--output")
                    .arg(self.d8_output_dir())
                    .arg("--lib")
                    .arg(android_jar)
                    .args(classes))
            }
        }
    }

    // `d8` takes individual class files rather than a directory.
    fn class_files(&self) -> Vec<PathBuf> {
        WalkDir::new(self.class_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().map_or(false, |ext| ext == "class"))
            .collect()
    }

    fn d8_output_dir(&self) -> PathBuf {
        self.output_dex
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Run the linker. Any failure is final.
    pub async fn run<R: ToolRunner>(&self, runner: &R) -> Result<(), BuildError> {
        let invocation = self.invocation()?;
        let output = runner
            .run(&invocation)
            .await
            .map_err(|source| BuildError::ToolLaunch {
                tool: invocation.tool_name(),
                source,
            })?;

        if !output.success() {
            return Err(BuildError::LinkFailed {
                command: invocation.command_line(),
                status: output.status(),
                output: output.combined(),
            });
        }

        if let Linker::D8 { .. } = self.linker {
            let produced = self.d8_output_dir().join(D8_OUTPUT_NAME);
            if produced != self.output_dex {
                debug!("Moving {:?} to {:?}", produced, self.output_dex);
                tokio::fs::rename(&produced, self.output_dex)
                    .await
                    .map_err(|source| BuildError::ReadArtifactFailed { path: produced, source })?;
            }
        }

        info!("Linked {:?} with {}", self.output_dex, self.linker.name());
        Ok(())
    }
}
