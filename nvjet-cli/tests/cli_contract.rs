//! Contract tests against the spawned `nvjet` binary.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU32, Ordering};

fn nvjet(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nvjet"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to spawn nvjet binary")
}

fn unique_temp_dir(tag: &str) -> PathBuf {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let dir = std::env::temp_dir().join(format!(
        "nvjet-cli-{tag}-{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn help_lists_decode_flags() {
    let out = nvjet(&["decode", "--help"]);
    assert!(out.status.success());
    let help = String::from_utf8_lossy(&out.stdout);
    for flag in [
        "--input",
        "--batch-size",
        "--total-images",
        "--warmup",
        "--threads",
        "--format",
        "--device",
        "--roi",
        "--backend",
        "--output",
        "--json",
    ] {
        assert!(help.contains(flag), "help is missing {flag}:\n{help}");
    }
}

#[test]
fn no_arguments_prints_usage_and_fails() {
    let out = nvjet(&[]);
    assert!(!out.status.success());
}

#[test]
fn missing_input_flag_fails() {
    let out = nvjet(&["decode"]);
    assert!(!out.status.success());
}

#[test]
fn duplicate_flag_is_rejected() {
    let out = nvjet(&["decode", "--input", "a", "--input", "b"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("--input"),
        "expected duplicate-flag diagnostic, got:\n{stderr}"
    );
}

#[test]
fn malformed_roi_is_rejected() {
    let out = nvjet(&["decode", "--input", "x", "--roi", "1,2,3"]);
    assert!(!out.status.success());
}

#[test]
fn nonexistent_input_exits_with_config_code() {
    let out = nvjet(&["decode", "--input", "/definitely/not/here"]);
    assert!(!out.status.success());
    // Configuration errors use the 5xx code group, truncated to a byte
    // by the OS.
    assert_eq!(out.status.code(), Some(500 % 256));
}

#[test]
fn dump_with_planar_yuv_format_is_a_config_error() {
    let dir = unique_temp_dir("yuv-dump");
    fs::write(dir.join("a.jpg"), b"x").unwrap();
    let out = nvjet(&[
        "decode",
        "--input",
        dir.to_str().unwrap(),
        "--format",
        "yuv",
        "--output",
        dir.to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    assert_eq!(out.status.code(), Some(500 % 256));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn probe_succeeds_without_a_gpu() {
    let out = nvjet(&["probe", "--json"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("\"available\""), "unexpected probe output:\n{stdout}");
}

#[test]
fn decode_json_errors_are_json_on_stdout() {
    let out = nvjet(&["decode", "--input", "/definitely/not/here", "--json"]);
    assert!(!out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("\"ok\":false") || stdout.contains("\"ok\": false"));
}
