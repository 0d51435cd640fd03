//! Time-lens CLI library.
//!
//! This crate provides the CLI interface for the reconciler: argument
//! parsing, configuration layering, and source-document I/O. The algorithm
//! itself lives in `lens-core`.

mod cli;
pub mod commands;
pub mod config;
pub mod input;

pub use cli::{Cli, Commands};
