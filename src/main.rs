// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Tobias Sarnowski <tobias@sarnowski.cloud>

//! `tallow` CLI entry point: argument parsing, file loading, and the
//! REPL/script dispatch.

use std::fs;
use std::process::ExitCode;

use tallow::config::Cli;
use tallow::{EX_DATAERR, EX_IOERR, EX_OK, EX_SOFTWARE, TallowError};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let mut vm = tallow::Vm::new();

    let result = match &cli.script {
        Some(path) => run_file(&mut vm, path, cli.disassemble),
        None => {
            tallow::repl::run(&mut vm, cli.disassemble);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::from(EX_OK as u8),
        Err(TallowError::Io { .. }) => ExitCode::from(EX_IOERR as u8),
        Err(TallowError::Compile(_)) => ExitCode::from(EX_DATAERR as u8),
        Err(TallowError::Runtime(_)) => ExitCode::from(EX_SOFTWARE as u8),
    }
}

fn run_file(vm: &mut tallow::Vm, path: &std::path::Path, disassemble: bool) -> Result<(), TallowError> {
    let source = fs::read_to_string(path).map_err(|source| TallowError::Io {
        path: path.display().to_string(),
        source,
    })?;
    vm.interpret(&source, disassemble)
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TALLOW_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
