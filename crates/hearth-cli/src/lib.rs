//! Hearth CLI library
//!
//! Argument parsing, layered configuration, command handlers and the
//! plain-text renderer behind the `hearth` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;

pub use cli::{Cli, Commands};
pub use commands::CommandDispatcher;
pub use config::CliAppConfig;
pub use error::{CliError, Result};
