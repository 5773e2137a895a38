//! # CLI Command Implementations
//!
//! Each subcommand of the `kondunite` tool lives in its own module with an
//! `Args` struct derived using `clap` and an `execute` function that calls
//! into the `kondunite` library.

pub mod completions;
pub mod unify;
