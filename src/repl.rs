// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Tobias Sarnowski <tobias@sarnowski.cloud>

//! Interactive read-eval-print loop. Each line is compiled and run
//! independently, but globals and interned strings persist across lines by
//! sharing one [`Vm`].

#[cfg(test)]
mod repl_test;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::vm::Vm;

/// Run the interactive loop until EOF (Ctrl-D) or an interrupt (Ctrl-C).
///
/// Compile and runtime errors are printed by the `Vm` itself and do not end
/// the session; only I/O failure from the line editor does.
pub fn run(vm: &mut Vm, disassemble: bool) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("could not start line editor: {err}");
            return;
        }
    };

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim_end_matches(['\n', '\r']);
                if trimmed.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(trimmed);
                if vm.interpret(trimmed, disassemble).is_err() {
                    debug!("line produced an error; continuing REPL session");
                }
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(err) => {
                eprintln!("readline error: {err}");
                break;
            }
        }
    }
}

/// Bounded-iteration variant for tests: runs at most `max_lines` lines from
/// an in-memory source, without touching the terminal.
#[cfg(test)]
pub fn run_lines(vm: &mut Vm, lines: &[&str], disassemble: bool) {
    for line in lines {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed.is_empty() {
            continue;
        }
        let _ = vm.interpret(trimmed, disassemble);
    }
}
