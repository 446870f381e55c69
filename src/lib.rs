//! argline - typed argument lines and command dispatch.
//!
//! Splits a line of text into quoted, escaped tokens, converts them to the
//! types a command asks for and routes the line to a registered command.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod utf8;

pub use error::{CommandError, Error, Result};
