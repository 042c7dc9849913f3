//! gendex
//!
//! Compiles the Android glue classes, links them into a DEX file and writes
//! a generated source file embedding it.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, debug};
use tracing_subscriber::EnvFilter;

use gendex_android_toolchain::{EnvSdkLocator, FixedSdkLocator, SdkLocator};
use gendex_build_engine::{BuildError, Pipeline, SystemRunner};
use gendex_core::GendexConfig;

/// Generate a source file embedding the Android glue DEX
#[derive(Parser, Debug)]
#[command(name = "gendex", version, about, long_about = None)]
struct Cli {
    /// Generated file to write
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(diagnostics) = err.downcast_ref::<BuildError>().and_then(BuildError::diagnostics) {
                eprintln!("{}", diagnostics.trim_end());
            }
            eprintln!("gendex: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // No -o means an empty path, which fails when the file is created.
    let output = cli.output.unwrap_or_default();

    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let config = GendexConfig::discover(&cwd)?;
    debug!("Configuration: {:?}", config);

    let locator: Box<dyn SdkLocator> = match &config.sdk_root {
        Some(root) => Box::new(FixedSdkLocator(root.clone())),
        None => Box::new(EnvSdkLocator::from_env()),
    };

    let report = Pipeline::new(config, locator, SystemRunner).generate(&output).await?;
    info!(
        "Generated {:?} from {} source(s) ({}, build-tools {} via {}, {} byte DEX)",
        report.output, report.sources, report.platform, report.build_tools, report.linker, report.dex_size
    );
    Ok(())
}
