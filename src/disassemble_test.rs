// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Tobias Sarnowski <tobias@sarnowski.cloud>

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::table::Table;

#[test]
fn disassembly_names_every_opcode_it_emits() {
    let mut strings = Table::new();
    let func = crate::compiler::compile(
        "var a = 1; if (a < 2) { print a + 1; } else { print a; }",
        &mut strings,
    )
    .expect("compiles");

    let out = disassemble_chunk(&func.chunk, "script");
    assert!(out.starts_with("== script ==\n"));
    assert!(out.contains("Constant"));
    assert!(out.contains("JumpIfFalse"));
    assert!(out.contains("Return"));
}
