//! Configuration management for the file manager storage layer
//!
//! Settings are read once at startup and never mutated afterwards. The layout
//! mirrors the file manager's JSON/TOML configuration: `options`, `images` and
//! `security` sections.

use config::{Config, Environment, File};
use serde::Deserialize;

/// Complete storage configuration
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub options: OptionsConfig,
    pub images: ImagesConfig,
    pub security: SecurityConfig,
}

/// General options
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OptionsConfig {
    /// Explicit files root. `false` or an empty value means "use the default
    /// `userfiles` folder next to the application".
    #[serde(rename = "fileRoot", alias = "fileroot")]
    pub file_root: Option<String>,

    /// When true, `file_root` is a suffix of the hosting document root
    /// instead of a standalone path
    #[serde(rename = "serverRoot", alias = "serverroot")]
    pub server_root: bool,

    /// strftime-style format used by `LocalStorage::format_date`
    #[serde(rename = "dateFormat", alias = "dateformat")]
    pub date_format: String,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            file_root: None,
            server_root: true,
            date_format: "%d %b %Y %H:%M".to_string(),
        }
    }
}

impl OptionsConfig {
    /// The configured root override, if any
    pub fn file_root_override(&self) -> Option<&str> {
        self.file_root
            .as_deref()
            .map(str::trim)
            .filter(|root| !root.is_empty() && *root != "false")
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ImagesConfig {
    pub thumbnail: ThumbnailConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThumbnailConfig {
    pub enabled: bool,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Security section
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SecurityConfig {
    /// Global read-only switch; denies every write permission check
    pub read_only: bool,
    pub extensions: RuleSetConfig,
    pub patterns: RuleSetConfig,
}

/// Raw allow/disallow rule set as it appears in configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RuleSetConfig {
    /// `ALLOW_LIST` or `DISALLOW_LIST`; anything else denies everything
    pub policy: String,
    pub restrictions: Vec<String>,
    pub ignorecase: bool,
}

impl Default for RuleSetConfig {
    fn default() -> Self {
        Self {
            policy: "DISALLOW_LIST".to_string(),
            restrictions: Vec::new(),
            ignorecase: true,
        }
    }
}

impl Settings {
    /// Load configuration from a file with `RFM_` environment overrides
    ///
    /// Nested keys use a double underscore, e.g. `RFM_SECURITY__READ_ONLY=true`.
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("RFM").separator("__"))
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validation for configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.options.date_format.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "options.dateFormat cannot be empty".into(),
            ));
        }

        if let Some(root) = &self.options.file_root {
            if root.trim().is_empty() {
                return Err(config::ConfigError::Message(
                    "options.fileRoot cannot be empty; use false for the default root".into(),
                ));
            }
        }

        Ok(())
    }
}
