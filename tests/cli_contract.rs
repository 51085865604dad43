// Contract tests: assert only durable external invariants.
// Exit codes and stream usage, never specific analyzer output.

#![cfg(unix)]

mod common;

use std::process::{Command, Stdio};

use common::{
    binary_path, install_slow_stub_analyzer, install_stub_analyzer, project, run, run_hook,
    MINIMAL_CONFIG,
};

#[test]
fn contract_exit_code_is_zero_one_or_two() {
    for (config, stub_exit) in [
        (Some(MINIMAL_CONFIG), 0),
        (Some(MINIMAL_CONFIG), 7),
        (None, 0),
        (Some("not xml"), 0),
    ] {
        let dir = project(config);
        install_stub_analyzer(dir.path(), stub_exit);
        let (_, _, exit_code) = run_hook(dir.path());
        assert!(
            [0, 1, 2].contains(&exit_code),
            "unexpected exit code {exit_code} for {config:?}/{stub_exit}"
        );
    }
}

#[test]
fn contract_any_nonzero_analyzer_status_maps_to_one() {
    for stub_exit in [1, 2, 3, 255] {
        let dir = project(Some(MINIMAL_CONFIG));
        install_stub_analyzer(dir.path(), stub_exit);
        let (_, _, exit_code) = run_hook(dir.path());
        assert_eq!(exit_code, 1, "analyzer exit {stub_exit}");
    }
}

#[test]
fn contract_no_stderr_on_clean_run() {
    let dir = project(Some(MINIMAL_CONFIG));
    install_stub_analyzer(dir.path(), 0);
    let (_, stderr, _) = run_hook(dir.path());
    assert!(
        stderr.is_empty(),
        "stderr should be empty in normal operation, got: {stderr}"
    );
}

#[test]
fn contract_default_root_is_current_directory() {
    let dir = project(Some(MINIMAL_CONFIG));
    install_stub_analyzer(dir.path(), 0);
    let output = Command::new(binary_path())
        .arg("hook")
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute binary");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn contract_unknown_subcommand_is_usage_error() {
    let (_, stderr, exit_code) = run(&["lint"]);
    assert_ne!(exit_code, 0);
    assert!(!stderr.is_empty());
}

// ---- Closed output streams ----

fn run_hook_with_closed_stream(stub_exit: i32, close_stdout: bool) -> Option<i32> {
    let dir = project(Some(MINIMAL_CONFIG));
    install_slow_stub_analyzer(dir.path(), stub_exit, 1);

    let mut cmd = Command::new(binary_path());
    cmd.args(["hook", "--root", dir.path().to_str().unwrap()])
        .env_remove("RUST_LOG")
        .stdin(Stdio::null());
    if close_stdout {
        cmd.stdout(Stdio::piped()).stderr(Stdio::null());
    } else {
        cmd.stdout(Stdio::null()).stderr(Stdio::piped());
    }
    let mut child = cmd.spawn().expect("failed to execute binary");

    // Drop the read end while the analyzer is still sleeping.
    drop(child.stdout.take());
    drop(child.stderr.take());

    child.wait().expect("failed to wait for binary").code()
}

#[test]
fn contract_closed_stdout_keeps_success_exit_code() {
    assert_eq!(run_hook_with_closed_stream(0, true), Some(0));
}

#[test]
fn contract_closed_stdout_keeps_errors_found_exit_code() {
    assert_eq!(run_hook_with_closed_stream(3, true), Some(1));
}

#[test]
fn contract_closed_stderr_keeps_errors_found_exit_code() {
    assert_eq!(run_hook_with_closed_stream(3, false), Some(1));
}
