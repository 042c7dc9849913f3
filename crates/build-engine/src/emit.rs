//! Source Emission
//!
//! Base64-encodes the DEX file and writes it out as a chunked string
//! literal in a generated Go source file.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::fmt::Write as _;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::info;

use gendex_core::{EmitConfig, GendexConfig};

use crate::process::{Invocation, ToolRunner};
use crate::BuildError;

/// Standard padded base64
pub fn encode(dex: &[u8]) -> String {
    STANDARD.encode(dex)
}

/// Split `data` into pieces of `width` characters, the last one shorter.
/// `data` is base64 text, so every boundary falls on a char boundary.
pub fn chunk(data: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut chunks = Vec::with_capacity(data.len() / width + 1);
    let mut rest = data;
    while !rest.is_empty() {
        let (head, tail) = rest.split_at(width.min(rest.len()));
        chunks.push(head);
        rest = tail;
    }
    chunks
}

/// Unformatted source with `payload` split into `width`-sized literals
pub fn render(payload: &str, width: usize, layout: &EmitConfig) -> String {
    let mut out = String::new();
    if !layout.license_header.is_empty() {
        out.push_str(layout.license_header.trim_end());
        out.push_str("\n\n");
    }
    let _ = writeln!(out, "// Code generated by {}. DO NOT EDIT.", layout.generator);
    out.push('\n');
    let _ = writeln!(out, "package {}", layout.package);
    out.push('\n');
    let _ = write!(out, "var {} =", layout.variable);
    for piece in chunk(payload, width) {
        let _ = write!(out, "\n\t`{}` +", piece);
    }
    out.push_str("\n\t``\n");
    out
}

/// Pipe `raw` through the formatter command. An empty command leaves the
/// source untouched.
pub async fn format_source<R: ToolRunner>(
    runner: &R,
    formatter: &[String],
    raw: String,
) -> Result<String, BuildError> {
    let Some((program, args)) = formatter.split_first() else {
        return Ok(raw);
    };

    let invocation = Invocation::new(program)
        .args(args)
        .stdin(raw.clone().into_bytes());

    let output = match runner.run(&invocation).await {
        Ok(output) => output,
        Err(e) => {
            return Err(BuildError::FormatFailed {
                reason: format!("cannot run {}: {}", program, e),
                raw,
            })
        }
    };

    if !output.success() {
        return Err(BuildError::FormatFailed {
            reason: format!(
                "{} exited with {}: {}",
                program,
                output.status(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            raw,
        });
    }

    match String::from_utf8(output.stdout) {
        Ok(formatted) => Ok(formatted),
        Err(_) => Err(BuildError::FormatFailed {
            reason: format!("{} produced invalid UTF-8", program),
            raw,
        }),
    }
}

/// Create or truncate `path` and write `contents`
pub async fn write_output(path: &Path, contents: &[u8]) -> Result<(), BuildError> {
    let write_failed = |source| BuildError::WriteOutputFailed {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(path).await.map_err(write_failed)?;
    file.write_all(contents).await.map_err(write_failed)?;
    file.flush().await.map_err(write_failed)?;
    Ok(())
}

/// Turns DEX bytes into the generated source file
pub struct Emitter<'a, R> {
    pub runner: &'a R,
    pub config: &'a GendexConfig,
}

impl<R: ToolRunner> Emitter<'_, R> {
    /// Encode, render, format and write `dex` to `output`
    pub async fn emit(&self, dex: &[u8], output: &Path) -> Result<(), BuildError> {
        let payload = encode(dex);
        let raw = render(&payload, self.config.chunk_width, &self.config.emit);

        let formatted = format_source(self.runner, &self.config.formatter, raw).await?;

        write_output(output, formatted.as_bytes()).await?;
        info!("Wrote {:?} ({} bytes of DEX, {} base64 chars)", output, dex.len(), payload.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::FakeRunner;

    fn bare_layout() -> EmitConfig {
        EmitConfig {
            license_header: String::new(),
            ..Default::default()
        }
    }

    #[test]
    fn test_encode_round_trip() {
        let dex = b"dex\n035\0\x01\x02\xff";
        let encoded = encode(dex);
        assert_eq!(encoded.len() % 4, 0);
        assert_eq!(STANDARD.decode(&encoded).unwrap(), dex);
    }

    #[test]
    fn test_chunk_widths() {
        let data = "a".repeat(150);
        let chunks = chunk(&data, 70);
        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![70, 70, 10]);
        assert_eq!(chunks.concat(), data);

        assert_eq!(chunk(&"b".repeat(140), 70).len(), 2);
        assert!(chunk("", 70).is_empty());
    }

    #[test]
    fn test_render_layout() {
        let source = render("ZGV4Cg==", 70, &bare_layout());
        assert_eq!(
            source,
            "// Code generated by gendex. DO NOT EDIT.\n\
             \n\
             package main\n\
             \n\
             var dexStr =\n\
             \t`ZGV4Cg==` +\n\
             \t``\n"
        );
    }

    #[test]
    fn test_render_empty_payload() {
        let source = render("", 70, &bare_layout());
        assert!(source.ends_with("var dexStr =\n\t``\n"));
    }

    #[test]
    fn test_render_license_first() {
        let source = render("QQ==", 70, &EmitConfig::default());
        assert!(source.starts_with("// Copyright 2015 The Go Authors."));
        assert!(source.contains("license that can be found in the LICENSE file.\n\n// Code generated"));
    }

    #[test]
    fn test_long_payload_reassembles() {
        let dex: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let source = render(&encode(&dex), 70, &bare_layout());

        let pieces: Vec<&str> = source
            .lines()
            .filter_map(|l| l.strip_prefix("\t`")?.strip_suffix("` +"))
            .collect();
        assert!(pieces.iter().all(|p| p.len() <= 70));
        assert!(pieces[..pieces.len() - 1].iter().all(|p| p.len() == 70));
        assert_eq!(STANDARD.decode(pieces.concat()).unwrap(), dex);
    }

    #[tokio::test]
    async fn test_formatter_failure_keeps_raw() {
        let runner = FakeRunner {
            fail: Some("gofmt"),
            ..Default::default()
        };
        let raw = "package main\n".to_string();
        let err = format_source(&runner, &["gofmt".to_string()], raw.clone())
            .await
            .unwrap_err();
        match err {
            BuildError::FormatFailed { reason, raw: kept } => {
                assert!(reason.contains("boom"));
                assert_eq!(kept, raw);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_formatter() {
        let runner = FakeRunner::default();
        let formatted = format_source(&runner, &[], "x".to_string()).await.unwrap();
        assert_eq!(formatted, "x");
        assert!(runner.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_emit_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dex.go");
        std::fs::write(&output, "stale contents").unwrap();

        let runner = FakeRunner::default();
        let config = GendexConfig::default();
        Emitter { runner: &runner, config: &config }
            .emit(b"dex\n", &output)
            .await
            .unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("\t`ZGV4Cg==` +\n"));
        assert!(written.ends_with("\t``\n"));

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, Path::new("gofmt"));
        assert_eq!(calls[0].stdin.as_deref(), Some(written.as_bytes()));
    }

    #[tokio::test]
    async fn test_write_to_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("dex.go");
        assert!(matches!(
            write_output(&output, b"x").await,
            Err(BuildError::WriteOutputFailed { .. })
        ));
    }
}
