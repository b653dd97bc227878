//! CLI module for the 25+5 clock.
//!
//! This module provides the command-line front end:
//! - `commands`: Command definitions using clap derive
//! - `input`: Stdin command parsing
//! - `display`: Terminal and JSON rendering

pub mod commands;
pub mod display;
pub mod input;

pub use commands::{Cli, Commands, RunArgs};
pub use display::{show_error, Display};
pub use input::{parse_line, spawn_command_reader, Command, ParseCommandError};
