//! End-to-end builds through the public API.

use std::fs;
use std::path::Path;

use goxc::{BuildConfig, Error, ToolchainLocation};

const HELLO: &str = "package main\n\nfunc main() { println(\"hello\") }\n";

fn write_source(dir: &Path) {
    fs::write(dir.join("main.go"), HELLO).unwrap();
}

#[cfg(unix)]
fn fake_go(dir: &Path, body: &str) -> ToolchainLocation {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("go");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    ToolchainLocation::explicit(&path).unwrap()
}

/// Stand-in for `go build -ldflags "-s -w" -o OUT SRC`: writes OUT.
#[cfg(unix)]
const WRITES_OUTPUT: &str = "[ \"$1\" = build ] || exit 2\n[ -f \"$6\" ] || exit 3\necho built > \"$5\"";

#[cfg(unix)]
#[test]
fn test_linux_amd64_scenario() {
    let tools = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    write_source(project.path());
    let go = fake_go(tools.path(), WRITES_OUTPUT);

    let config = BuildConfig::new()
        .with_project_dir(project.path())
        .with_source("main.go")
        .with_goos("linux")
        .with_goarch("amd64")
        .with_base_name("app");
    let (used, result) = goxc::build(&config, || Some(go.clone())).unwrap();

    let expected = project.path().join("app-linux-amd64");
    assert_eq!(used, go);
    assert!(result.success());
    assert_eq!(result.artifact(), Some(expected.as_path()));
    assert!(expected.is_file());
}

#[cfg(unix)]
#[test]
fn test_failed_build_surfaces_output() {
    let tools = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    write_source(project.path());
    let go = fake_go(tools.path(), "echo './main.go:3:15: undefined: x'\nexit 1");

    let config = BuildConfig::new().with_project_dir(project.path());
    let err = goxc::build(&config, || Some(go)).unwrap_err();
    match err {
        Error::BuildFailed { detail, output } => {
            assert!(detail.contains("status 1"), "detail: {detail}");
            assert_eq!(output, "./main.go:3:15: undefined: x\n");
        }
        other => panic!("expected BuildFailed, got {other:?}"),
    }
    assert!(!project.path().join("main-windows-amd64.exe").exists());
}

#[test]
fn test_invalid_project_path() {
    let temp = tempfile::tempdir().unwrap();
    let config = BuildConfig::new().with_project_dir(temp.path().join("does/not/exist"));
    let err = goxc::build(&config, || panic!("discovery must not run")).unwrap_err();
    assert!(matches!(err, Error::InvalidPath { .. }));
}

#[test]
#[ignore = "requires a Go toolchain"]
fn test_real_toolchain_build() {
    let Some(go) = goxc::locate_go() else {
        eprintln!("Skipping test: go not found");
        return;
    };
    let project = tempfile::tempdir().unwrap();
    write_source(project.path());

    let config = BuildConfig::new()
        .with_project_dir(project.path())
        .with_goos("linux")
        .with_goarch("arm64")
        .with_base_name("hello");
    let (_, result) = goxc::build(&config, || Some(go)).unwrap();
    assert!(project.path().join("hello-linux-arm64").is_file());
    assert!(result.success());
}
