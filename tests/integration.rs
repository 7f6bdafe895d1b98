// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Tobias Sarnowski <tobias@sarnowski.cloud>

//! Black-box end-to-end tests: run the `tallow` binary against a script on
//! disk and assert on stdout and exit code.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write as _;
use std::process::Command;

struct Run {
    stdout: String,
    stderr: String,
    code: i32,
}

fn unique_script_path() -> std::path::PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("tallow-test-{}-{n}.tallow", std::process::id()))
}

fn run_script(source: &str) -> Run {
    let path = unique_script_path();
    std::fs::File::create(&path)
        .and_then(|mut f| f.write_all(source.as_bytes()))
        .expect("write temp script");

    let output = Command::new(env!("CARGO_BIN_EXE_tallow"))
        .arg(&path)
        .output()
        .expect("failed to run tallow binary");
    let _ = std::fs::remove_file(&path);

    Run {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        code: output.status.code().unwrap_or(-1),
    }
}

#[test]
fn arithmetic_precedence() {
    let run = run_script("print 1 + 2 * 3;");
    assert_eq!(run.stdout, "7\n");
    assert_eq!(run.code, 0);
}

#[test]
fn interned_strings_are_reference_equal() {
    let run = run_script("var a = \"foo\"; var b = \"foo\"; print a == b;");
    assert_eq!(run.stdout, "true\n");
    assert_eq!(run.code, 0);
}

#[test]
fn for_loop_accumulation() {
    let run = run_script("var x = 0; for (var i = 0; i < 3; i = i + 1) { x = x + i; } print x;");
    assert_eq!(run.stdout, "3\n");
    assert_eq!(run.code, 0);
}

#[test]
fn short_circuit_or() {
    let run = run_script("if (nil or 0 or \"x\") { print \"truthy\"; } else { print \"falsy\"; }");
    assert_eq!(run.stdout, "truthy\n");
    assert_eq!(run.code, 0);
}

#[test]
fn block_scope_shadowing() {
    let run = run_script("{ var a = 1; { var a = 2; print a; } print a; }");
    assert_eq!(run.stdout, "2\n1\n");
    assert_eq!(run.code, 0);
}

#[test]
fn undefined_global_is_a_runtime_error() {
    let run = run_script("print y;");
    assert_eq!(run.stdout, "");
    assert!(run.stderr.contains("undefined variable 'y'"));
    assert!(run.stderr.contains("[line 1] in script"));
    assert_eq!(run.code, 70);
}

#[test]
fn mismatched_operand_types_is_a_runtime_error() {
    let run = run_script("1 + \"x\";");
    assert!(run.stderr.contains("unexpected operands"));
    assert_eq!(run.code, 70);
}

#[test]
fn compile_error_exits_65() {
    let run = run_script("1 +;");
    assert_eq!(run.code, 65);
}

#[test]
fn missing_script_file_exits_74() {
    let output = Command::new(env!("CARGO_BIN_EXE_tallow"))
        .arg("/nonexistent/path/does-not-exist.tallow")
        .output()
        .expect("failed to run tallow binary");
    assert_eq!(output.status.code(), Some(74));
}
