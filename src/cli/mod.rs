//! Command-line interface

pub mod commands;

pub use commands::{cmd_show_config, cmd_token, cmd_vault, load_settings, CliResult};
