// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Tobias Sarnowski <tobias@sarnowski.cloud>

//! Human-readable dump of a chunk's bytecode, for the `--disassemble` flag
//! and for tests that want to assert on emitted bytecode shape.

#[cfg(test)]
mod disassemble_test;

use std::fmt::Write as _;

use crate::chunk::{Chunk, OpCode};

/// Disassemble `chunk` into a multi-line string headed by `name`.
#[must_use]
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {name} ==");

    let mut offset = 0;
    while offset < chunk.len() {
        offset = disassemble_instruction(chunk, offset, &mut out);
    }

    if !chunk.constants.is_empty() {
        let _ = writeln!(out, "constants:");
        for (i, value) in chunk.constants.iter().enumerate() {
            let _ = writeln!(out, "  {i:04}: {value}");
        }
    }

    out
}

fn disassemble_instruction(chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let _ = write!(out, "{offset:04} ");
    if offset > 0 && chunk.line_at(offset) == chunk.line_at(offset - 1) {
        let _ = write!(out, "   | ");
    } else {
        let _ = write!(out, "{:4} ", chunk.line_at(offset));
    }

    let byte = chunk.code()[offset];
    let Some(op) = OpCode::from_u8(byte) else {
        let _ = writeln!(out, "unknown opcode {byte}");
        return offset + 1;
    };

    match op {
        OpCode::Nil
        | OpCode::True
        | OpCode::False
        | OpCode::Pop
        | OpCode::Equal
        | OpCode::Greater
        | OpCode::Less
        | OpCode::Add
        | OpCode::Subtract
        | OpCode::Multiply
        | OpCode::Divide
        | OpCode::Not
        | OpCode::Negate
        | OpCode::Print
        | OpCode::Return => simple_instruction(op, offset, out),
        OpCode::Constant => constant_instruction(op, chunk, offset, out),
        OpCode::GetLocal | OpCode::SetLocal => byte_instruction(op, chunk, offset, out),
        OpCode::GetGlobal | OpCode::DefineGlobal | OpCode::SetGlobal => {
            constant_instruction(op, chunk, offset, out)
        }
        OpCode::JumpIfFalse | OpCode::Jump => jump_instruction(op, chunk, offset, out, 1),
        OpCode::Loop => jump_instruction(op, chunk, offset, out, -1),
    }
}

fn simple_instruction(op: OpCode, offset: usize, out: &mut String) -> usize {
    let _ = writeln!(out, "{op:?}");
    offset + 1
}

fn byte_instruction(op: OpCode, chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let slot = chunk.code()[offset + 1];
    let _ = writeln!(out, "{op:?} {slot}");
    offset + 2
}

fn constant_instruction(op: OpCode, chunk: &Chunk, offset: usize, out: &mut String) -> usize {
    let index = chunk.code()[offset + 1];
    let value = &chunk.constants[index as usize];
    let _ = writeln!(out, "{op:?} {index:4} '{value}'");
    offset + 2
}

fn jump_instruction(
    op: OpCode,
    chunk: &Chunk,
    offset: usize,
    out: &mut String,
    sign: i32,
) -> usize {
    let jump = chunk.read_u16(offset + 1);
    let target = i64::try_from(offset).unwrap_or(0) + 3 + i64::from(sign) * i64::from(jump);
    let _ = writeln!(out, "{op:?} {offset:4} -> {target}");
    offset + 3
}
