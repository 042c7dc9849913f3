//! Java Source Discovery

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::BuildError;

/// Glob for `pattern` inside `dir`, with `dir` taken literally
pub fn source_glob(dir: &Path, pattern: &str) -> String {
    let dir = dir.to_string_lossy();
    let dir = dir.trim_end_matches('/');
    format!("{}/{}", glob::Pattern::escape(dir), pattern)
}

/// Expand `pattern` inside `dir`. At least one file must match.
pub fn find_sources(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, BuildError> {
    let full = source_glob(dir, pattern);

    let entries = glob::glob(&full).map_err(|source| BuildError::InvalidSourcePattern {
        pattern: full.clone(),
        source,
    })?;

    let mut sources = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => sources.push(path),
            Err(e) => warn!("Skipping unreadable {:?}: {}", e.path(), e.error()),
        }
    }

    if sources.is_empty() {
        return Err(BuildError::NoSourceFilesFound(full));
    }

    sources.sort();
    info!("Found {} Java source(s) in {:?}", sources.len(), dir);
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_sorted_matches_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("RunnableFunc.java"), "").unwrap();
        fs::write(dir.path().join("GoNativeActivity.java"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let sources = find_sources(dir.path(), "*.java").unwrap();
        assert_eq!(
            sources,
            vec![
                dir.path().join("GoNativeActivity.java"),
                dir.path().join("RunnableFunc.java"),
            ]
        );
    }

    #[test]
    fn test_no_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let err = find_sources(dir.path(), "*.java").unwrap_err();
        assert!(matches!(err, BuildError::NoSourceFilesFound(ref p) if p.ends_with("/*.java")));
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_sources(dir.path(), "[*.java"),
            Err(BuildError::InvalidSourcePattern { .. })
        ));
    }

    #[test]
    fn test_dir_is_escaped() {
        assert_eq!(source_glob(Path::new("app[1]/"), "*.java"), "app[[]1[]]/*.java");
        assert_eq!(source_glob(Path::new("../../app"), "*.java"), "../../app/*.java");
    }
}
