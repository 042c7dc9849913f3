//! Generation Pipeline
//!
//! Runs the whole generation in order: workspace, SDK, sources, compile,
//! link, emit. The first failure ends the run, and the workspace is removed
//! on every path.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, debug, warn};

use gendex_android_toolchain::{JavaCompiler, Sdk, SdkLocator};
use gendex_core::GendexConfig;

use crate::dex::{LinkQuery, Linker};
use crate::emit::Emitter;
use crate::javac::CompileQuery;
use crate::process::ToolRunner;
use crate::sources::find_sources;
use crate::workspace::Workspace;
use crate::BuildError;

/// Pipeline progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    WorkspaceReady,
    SourcesFound,
    Compiled,
    Linked,
    Encoded,
    Written,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::WorkspaceReady => "workspace-ready",
            Stage::SourcesFound => "sources-found",
            Stage::Compiled => "compiled",
            Stage::Linked => "linked",
            Stage::Encoded => "encoded",
            Stage::Written => "written",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Generated source file
    pub output: PathBuf,
    /// Platform compiled against, e.g. `android-34`
    pub platform: String,
    /// Build-tools version used for linking
    pub build_tools: String,
    /// `dx` or `d8`
    pub linker: &'static str,
    /// Number of compiled Java sources
    pub sources: usize,
    /// DEX size in bytes
    pub dex_size: usize,
}

/// The generator, wired to an SDK locator and a process runner
pub struct Pipeline<R> {
    config: GendexConfig,
    locator: Box<dyn SdkLocator>,
    runner: R,
}

impl<R: ToolRunner> Pipeline<R> {
    pub fn new(config: GendexConfig, locator: Box<dyn SdkLocator>, runner: R) -> Self {
        Self { config, locator, runner }
    }

    /// Generate `output`. The temporary workspace is gone when this returns.
    pub async fn generate(&self, output: &Path) -> Result<GenerationReport, BuildError> {
        let mut stage = Stage::Init;
        debug!("Stage: {}", stage);

        let workspace = Workspace::acquire(self.config.temp_dir.as_deref(), &self.config.package_path)?;
        advance(&mut stage, Stage::WorkspaceReady);

        let result = self.generate_in(&workspace, output, &mut stage).await;

        match (result, workspace.release()) {
            (Ok(report), Ok(())) => {
                advance(&mut stage, Stage::Done);
                Ok(report)
            }
            (Ok(_), Err(cleanup)) => {
                advance(&mut stage, Stage::Failed);
                Err(cleanup)
            }
            (Err(err), cleanup) => {
                if let Err(cleanup) = cleanup {
                    warn!("Could not remove workspace: {}", cleanup);
                }
                debug!("Failed after stage {}", stage);
                advance(&mut stage, Stage::Failed);
                Err(err)
            }
        }
    }

    async fn generate_in(
        &self,
        workspace: &Workspace,
        output: &Path,
        stage: &mut Stage,
    ) -> Result<GenerationReport, BuildError> {
        let sdk = Sdk::new(self.locator.locate_sdk_root()?);
        info!("Using Android SDK at {:?}", sdk.root());

        let sources = find_sources(&self.config.source_dir, &self.config.source_pattern)?;
        advance(stage, Stage::SourcesFound);

        let platform = sdk.platform()?;
        info!("Compiling against {}", platform.version());
        let compiler = JavaCompiler::locate(self.config.javac.as_deref())?;

        let class_dir = workspace.work_dir();
        CompileQuery {
            compiler: &compiler,
            release: &self.config.java_release,
            boot_classpath: &platform.android_jar(),
            output_dir: &class_dir,
            sources: &sources,
        }
        .run(&self.runner)
        .await?;
        advance(stage, Stage::Compiled);

        let build_tools = sdk.build_tools()?;
        let linker = Linker::select(self.config.linker, &build_tools, &platform);
        info!("Linking with {} from build-tools {}", linker.name(), build_tools.version());

        let dex_path = workspace.dex_path();
        LinkQuery {
            linker: &linker,
            class_dir: &class_dir,
            output_dex: &dex_path,
        }
        .run(&self.runner)
        .await?;
        advance(stage, Stage::Linked);

        let dex = tokio::fs::read(&dex_path)
            .await
            .map_err(|source| BuildError::ReadArtifactFailed {
                path: dex_path.clone(),
                source,
            })?;
        info!("DEX file is {} bytes", dex.len());
        advance(stage, Stage::Encoded);

        Emitter {
            runner: &self.runner,
            config: &self.config,
        }
        .emit(&dex, output)
        .await?;
        advance(stage, Stage::Written);

        Ok(GenerationReport {
            output: output.to_path_buf(),
            platform: platform.version(),
            build_tools: build_tools.version(),
            linker: linker.name(),
            sources: sources.len(),
            dex_size: dex.len(),
        })
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!("Stage: {} -> {}", stage, next);
    *stage = next;
}
