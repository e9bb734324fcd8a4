//! Configuration management for pcf.
//!
//! Parses `pcf.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [preserve]
//! tags = ["code", "pre"]
//! in_posts = true
//! in_comments = true
//! wrap_multiline = true
//! nbsp_for_spaces = true
//! nl2br = false
//! block_container = "pre"
//! max_content_size = 102400
//! ```
//!
//! Every key is optional and falls back to [`PreserveSettings::default`].

use pcf_core::PreserveSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the preserved tag names.
    pub tags: Option<Vec<String>>,
    /// Override nbsp substitution.
    pub use_nbsp_for_spaces: Option<bool>,
    /// Override newline-to-break conversion.
    pub nl2br: Option<bool>,
    /// Override multiline wrapping.
    pub wrap_multiline: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "pcf.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pipeline settings from the `[preserve]` table.
    pub preserve: PreserveSettings,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a tag-like name to be a single token.
fn require_no_whitespace(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "{field} cannot contain whitespace: {value:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `pcf.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final settings are invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config(&cwd)),
        };

        let mut config = match path {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(tags) = &settings.tags {
            self.preserve.preserve_tags.clone_from(tags);
        }
        if let Some(nbsp) = settings.use_nbsp_for_spaces {
            self.preserve.use_nbsp_for_spaces = nbsp;
        }
        if let Some(nl2br) = settings.nl2br {
            self.preserve.nl2br = nl2br;
        }
        if let Some(wrap) = settings.wrap_multiline {
            self.preserve.wrap_multiline_code_in_pre = wrap;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Tag names may contain pattern metacharacters; they are matched
    /// literally.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let preserve = &self.preserve;

        for tag in &preserve.preserve_tags {
            require_non_empty(tag, "preserve.tags entry")?;
            require_no_whitespace(tag, "preserve.tags entry")?;
        }

        require_non_empty(&preserve.block_container, "preserve.block_container")?;
        require_no_whitespace(&preserve.block_container, "preserve.block_container")?;

        if preserve.max_content_size == 0 {
            return Err(ConfigError::Validation(
                "preserve.max_content_size must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }
}
