// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Tobias Sarnowski <tobias@sarnowski.cloud>

//! Crate-wide error type used by the CLI entry point to pick an exit code.

use thiserror::Error;

use crate::compiler::CompileError;
use crate::vm::RuntimeError;

/// The top-level error type returned from `Vm::interpret` and from file
/// loading. `main` maps each variant to a sysexits-style exit code.
#[derive(Debug, Error)]
pub enum TallowError {
    #[error("could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

pub type Result<T> = std::result::Result<T, TallowError>;
