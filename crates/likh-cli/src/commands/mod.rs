//! Subcommands of the `likh` binary.

pub mod config;
pub mod extract;
pub mod prompt;
