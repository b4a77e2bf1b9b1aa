//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing and subcommand handlers.

mod args;
mod commands;

pub use args::{Args, Command, ConfigAction, RenderArgs};
pub use commands::{handle_config_action, model_info, run_render, CliError};
