// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Tobias Sarnowski <tobias@sarnowski.cloud>

//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// A stack-based bytecode virtual machine for a small scripting language.
#[derive(Debug, Parser)]
#[command(name = "tallow", version, about)]
pub struct Cli {
    /// Script to run. With no script, starts an interactive REPL.
    pub script: Option<PathBuf>,

    /// Print the disassembly of each compiled chunk to stderr before running it.
    #[arg(long)]
    pub disassemble: bool,

    /// Increase log verbosity (can also be set via `TALLOW_LOG`).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
