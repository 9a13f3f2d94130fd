#![cfg(unix)]

use std::fs::{create_dir_all, set_permissions, write, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;
use serde_json::Value;

const DEPENDENCY_LIST: &str = "[INFO]    com.example:unlicensed:jar:1.0:compile";

const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <developers><developer><name>Nobody</name></developer></developers>
</project>"#;

fn fake_mvn(dir: &Path) -> PathBuf {
    let path = dir.join("mvn");
    write(
        &path,
        format!(
            "#!/bin/sh\ncase \"$*\" in\n  *dependency:list*) echo \"{}\";;\nesac\nexit 0\n",
            DEPENDENCY_LIST
        ),
    )
    .unwrap();
    set_permissions(&path, Permissions::from_mode(0o755)).unwrap();
    path
}

fn unpacked_project(dir: &Path) -> PathBuf {
    let project = dir.join("project");
    let unpacked = project.join("target/dependency/com/example/unlicensed/1.0");
    create_dir_all(unpacked.join("com/example")).unwrap();
    write(unpacked.join("unlicensed-1.0.pom"), POM).unwrap();
    write(unpacked.join("com/example/Unlicensed.class"), b"\xca\xfe\xba\xbe").unwrap();
    project
}

#[test]
fn test_json_output_is_not_mixed_with_logs() {
    let dir = tempfile::tempdir().unwrap();
    let mvn = fake_mvn(dir.path());
    let project = unpacked_project(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_gen-notice"))
        .arg(&project)
        .arg("--mvn")
        .arg(&mvn)
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["entries"], Value::Array(vec![]));
    assert_eq!(report["missing_license"]["artifact_id"], "unlicensed");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(
        stderr
            .matches("License is missing for com.example:unlicensed:1.0")
            .count(),
        1
    );
    assert!(project.join("THIRDPARTY.md").is_file());
}
