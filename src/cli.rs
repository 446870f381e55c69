//! Command-line argument parsing for the argline REPL.

use clap::Parser;
use std::path::PathBuf;

/// Interactive command line: reads lines from stdin and dispatches them.
#[derive(Parser, Debug)]
#[command(name = "argline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", env = "ARGLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Prompt printed before each line (overrides the config file)
    #[arg(long, value_name = "STR")]
    pub prompt: Option<String>,

    /// Read JSON invocations instead of text lines
    #[arg(long)]
    pub structured: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }
}
