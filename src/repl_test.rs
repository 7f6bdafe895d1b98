// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Tobias Sarnowski <tobias@sarnowski.cloud>

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn empty_lines_are_silently_skipped() {
    let mut vm = Vm::new();
    run_lines(&mut vm, &["", "   ", "\n"], false);
    // no assertion beyond "did not panic": an empty line is a no-op.
}

#[test]
fn state_persists_across_lines_like_a_real_session() {
    let mut vm = Vm::new();
    run_lines(
        &mut vm,
        &["var greeting = \"hi\";", "print greeting;"],
        false,
    );
}

#[test]
fn a_compile_error_on_one_line_does_not_end_the_session() {
    let mut vm = Vm::new();
    run_lines(&mut vm, &["1 +;", "print 1;"], false);
}
