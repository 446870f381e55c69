//! Configuration management for argline.
//!
//! Loads the REPL settings, usage-string style and extra command aliases from
//! a TOML file. A missing file means defaults.

use crate::commands::{CommandRegistry, UsageStyle, DEFAULT_HELP_PAGE_SIZE};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Interactive prompt settings.
    #[serde(default)]
    pub repl: ReplConfig,

    /// Pieces used to render usage strings.
    #[serde(default)]
    pub usage: UsageStyle,

    /// Extra aliases, alias name -> existing command name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// Interactive prompt settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplConfig {
    /// Printed before reading each line.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Line that ends the session.
    #[serde(default = "default_quit_word")]
    pub quit_word: String,

    /// Commands listed per `help` page.
    #[serde(default = "default_help_page_size")]
    pub help_page_size: usize,
}

fn default_prompt() -> String {
    "/".to_string()
}

fn default_quit_word() -> String {
    "quit".to_string()
}

fn default_help_page_size() -> usize {
    DEFAULT_HELP_PAGE_SIZE
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            quit_word: default_quit_word(),
            help_page_size: default_help_page_size(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("argline")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            Error::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;

        if config.repl.help_page_size == 0 {
            return Err(Error::config(format!(
                "Configuration error in {}:\n  help_page_size must be at least 1",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Applies the usage style and aliases to `registry`.
    ///
    /// Returns the aliases that could not be added.
    pub fn apply(&self, registry: &CommandRegistry) -> Vec<String> {
        registry.set_usage_style(self.usage.clone());

        let mut rejected = Vec::new();
        for (alias, target) in &self.aliases {
            if !registry.add_alias(alias.clone(), target) {
                tracing::warn!(alias = %alias, target = %target, "Could not add configured alias");
                rejected.push(alias.clone());
            }
        }
        rejected
    }
}
