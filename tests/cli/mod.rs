use std::process::{Command, Output};

use crate::utils::scratch::ScratchDir;

/// Exit code observed for `std::process::exit(-1)`.
const FAILURE_CODE: i32 = if cfg!(windows) { -1 } else { 255 };

fn run_dll2lib(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dll2lib"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("Could not run dll2lib")
}

#[test]
fn unknown_flag() {
    let output = run_dll2lib(&["/bogus", "widgets.dll"]);

    assert_eq!(output.status.code(), Some(FAILURE_CODE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/bogus"), "unexpected stderr: {stderr}");
}

#[test]
fn missing_input() {
    let scratch = ScratchDir::new("cli-missing-input");
    let input = scratch.path().join("widgets.dll");

    let output = run_dll2lib(&[input.to_str().expect("scratch path should be utf-8")]);

    assert_eq!(output.status.code(), Some(FAILURE_CODE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("could not find input file"),
        "unexpected stderr: {stderr}"
    );
    assert!(!scratch.path().join("widgets.lib").exists());
}

#[test]
fn help_exit_status() {
    for help in ["/help", "-help", "--HELP"] {
        let output = run_dll2lib(&[help]);

        assert_eq!(output.status.code(), Some(FAILURE_CODE), "{help}");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("dll2lib [options] <dll>"), "{help}: {stdout}");
    }
}

#[test]
fn missing_response_file() {
    let scratch = ScratchDir::new("cli-missing-response-file");
    let response = format!("@{}", scratch.path().join("args.rsp").display());

    let output = run_dll2lib(&[&response]);

    assert_eq!(output.status.code(), Some(FAILURE_CODE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("could not expand response file"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn version() {
    let output = run_dll2lib(&["--version"]);
    assert_eq!(output.status.code(), Some(0));
}
