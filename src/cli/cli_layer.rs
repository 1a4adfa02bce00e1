// CLI layer - argument definitions, subcommand handlers and JSON output.

pub mod args;
pub mod output;

#[path = "commands/command_catalog.rs"]
pub mod commands;

pub use args::{Cli, Commands};
