//! # Completions Command Implementation
//!
//! Prints a shell completion script for `kondunite` generated by
//! `clap_complete`, covering the `unify` flags such as `--target`,
//! `--img` and `--repl-registry`.
//!
//! ## Example
//!
//! ```bash
//! kondunite completions bash > ~/.local/share/bash-completion/completions/kondunite
//! kondunite completions zsh > ~/.zfunc/_kondunite
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io::{self, Write};

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command, writing the script to stdout.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}
