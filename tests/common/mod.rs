// Shared test helpers for integration tests.
// Used by cli_test.rs and cli_contract.rs.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub const MINIMAL_CONFIG: &str = r#"<?xml version="1.0"?>
<configuration>
    <source><path>src</path></source>
    <output mode="text"/>
</configuration>
"#;

pub fn binary_path() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_BIN_EXE_phpmd-hook"));
    assert!(path.exists(), "binary not found at {}", path.display());
    path
}

/// A temporary project root with an optional `phpmd.xml`.
pub fn project(config: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create project dir");
    if let Some(xml) = config {
        std::fs::write(dir.path().join("phpmd.xml"), xml).expect("failed to write config");
    }
    dir
}

/// Installs `vendor/bin/phpmd` as a shell script that prints each argument
/// on its own line, touches `ran` in the project root, and exits with
/// `exit_code`.
#[cfg(unix)]
pub fn install_stub_analyzer(root: &Path, exit_code: i32) {
    install_stub_script(root, exit_code, "");
}

/// Like [`install_stub_analyzer`], but sleeps `seconds` before printing.
#[cfg(unix)]
pub fn install_slow_stub_analyzer(root: &Path, exit_code: i32, seconds: u32) {
    install_stub_script(root, exit_code, &format!("sleep {seconds}\n"));
}

#[cfg(unix)]
fn install_stub_script(root: &Path, exit_code: i32, prelude: &str) {
    use std::os::unix::fs::PermissionsExt;

    let bin = root.join("vendor").join("bin");
    std::fs::create_dir_all(&bin).expect("failed to create vendor/bin");
    let script = format!(
        "#!/bin/sh\n{prelude}touch \"{}\"\nprintf '%s\\n' \"$@\"\nexit {exit_code}\n",
        root.join("ran").display()
    );
    let stub = bin.join("phpmd");
    std::fs::write(&stub, script).expect("failed to write stub");
    std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755))
        .expect("failed to mark stub executable");
}

pub fn analyzer_ran(root: &Path) -> bool {
    root.join("ran").exists()
}

/// Runs the binary with the given args.
/// Returns (stdout, stderr, exit_code).
pub fn run(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(binary_path())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute binary");

    let stdout = String::from_utf8(output.stdout).expect("stdout not valid UTF-8");
    let stderr = String::from_utf8(output.stderr).expect("stderr not valid UTF-8");
    let exit_code = output.status.code().unwrap_or(-1);
    (stdout, stderr, exit_code)
}

pub fn run_hook(root: &Path) -> (String, String, i32) {
    run(&["hook", "--root", root.to_str().expect("utf-8 temp path")])
}

pub fn run_args(root: &Path) -> (String, String, i32) {
    run(&["args", "--root", root.to_str().expect("utf-8 temp path")])
}
