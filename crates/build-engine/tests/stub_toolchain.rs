//! Runs the real process runner against shell-script stand-ins for the
//! Android toolchain.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use gendex_android_toolchain::FixedSdkLocator;
use gendex_build_engine::{Pipeline, SystemRunner};
use gendex_core::GendexConfig;

const JAVAC_STUB: &str = r#"#!/bin/sh
while [ $# -gt 0 ]; do
  if [ "$1" = "-d" ]; then out="$2"; fi
  shift
done
mkdir -p "$out/org/golang/app" && printf 'class' > "$out/org/golang/app/Empty.class"
"#;

const DX_STUB: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in --output=*) out="${arg#--output=}" ;; esac
done
printf 'dex\n' > "$out"
"#;

fn write_script(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[tokio::test]
async fn test_generate_with_stub_toolchain() {
    let root = tempfile::tempdir().unwrap();
    let sdk = root.path().join("sdk");
    fs::create_dir_all(sdk.join("platforms/android-34")).unwrap();
    fs::write(sdk.join("platforms/android-34/android.jar"), b"").unwrap();
    fs::create_dir_all(sdk.join("build-tools/30.0.3")).unwrap();
    write_script(&sdk.join("build-tools/30.0.3/dx"), DX_STUB);

    let javac = root.path().join("javac");
    write_script(&javac, JAVAC_STUB);

    let app = root.path().join("app");
    fs::create_dir_all(&app).unwrap();
    fs::write(app.join("Empty.java"), "package org.golang.app;\nclass Empty {}\n").unwrap();

    let scratch = root.path().join("tmp");
    fs::create_dir_all(&scratch).unwrap();

    let config = GendexConfig {
        source_dir: app,
        javac: Some(javac),
        temp_dir: Some(scratch.clone()),
        formatter: vec!["cat".to_string()],
        ..Default::default()
    };
    let output = root.path().join("dex.go");

    let report = Pipeline::new(config, Box::new(FixedSdkLocator(sdk)), SystemRunner)
        .generate(&output)
        .await
        .unwrap();
    assert_eq!(report.linker, "dx");
    assert_eq!(report.dex_size, 4);

    let generated = fs::read_to_string(&output).unwrap();
    assert!(generated.contains("// Code generated by gendex. DO NOT EDIT."));
    assert!(generated.contains("\t`ZGV4Cg==` +\n\t``\n"));
    assert_eq!(fs::read_dir(&scratch).unwrap().count(), 0);
}
