//! Java Compilation
//!
//! Compiles the glue sources against the platform's `android.jar`.

use std::path::{Path, PathBuf};
use tracing::info;

use gendex_android_toolchain::JavaCompiler;

use crate::process::{Invocation, ToolRunner};
use crate::BuildError;

/// Parameters of one `javac` run
#[derive(Debug, Clone)]
pub struct CompileQuery<'a> {
    /// Compiler binary
    pub compiler: &'a JavaCompiler,
    /// Language level for `-source` and `-target`
    pub release: &'a str,
    /// Platform classes to resolve against, normally `android.jar`
    pub boot_classpath: &'a Path,
    /// Where the class files go
    pub output_dir: &'a Path,
    /// Sources to compile
    pub sources: &'a [PathBuf],
}

impl CompileQuery<'_> {
    pub fn invocation(&self) -> Invocation {
        Invocation::new(self.compiler.path())
            .args(["-source", self.release, "-target", self.release])
            .arg("-bootclasspath")
            .arg(self.boot_classpath)
            .arg("-d")
            .arg(self.output_dir)
            .args(self.sources.iter().map(|p| p.as_os_str()))
    }

    /// Run the compiler. Any failure is final.
    pub async fn run<R: ToolRunner>(&self, runner: &R) -> Result<(), BuildError> {
        let invocation = self.invocation();
        let output = runner
            .run(&invocation)
            .await
            .map_err(|source| BuildError::ToolLaunch {
                tool: invocation.tool_name(),
                source,
            })?;

        if !output.success() {
            return Err(BuildError::CompileFailed {
                command: invocation.command_line(),
                status: output.status(),
                output: output.combined(),
            });
        }

        info!("Compiled {} source(s) into {:?}", self.sources.len(), self.output_dir);
        Ok(())
    }
}
