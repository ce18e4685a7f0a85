//! CLI module for idearalph - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
