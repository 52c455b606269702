//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use luna_oracle::OracleConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, OracleConfig>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Where this configuration is saved
    #[serde(skip)]
    path: Option<PathBuf>,

    /// Why the file at `path` could not be loaded; such a config is never saved
    #[serde(skip)]
    load_error: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Line-edit history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Labeled fields
    Pretty,
    /// JSON format
    Json,
}

impl Config {
    /// Luna's directory under the home directory.
    pub fn dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".luna"))
    }

    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::dir()?.join("config.toml"))
    }

    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist. Later saves go to the same path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            toml::from_str::<Config>(&contents)?
        } else {
            Self::default()
        };
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load configuration from `path`, or use the defaults when the file
    /// cannot be read or parsed.
    ///
    /// A configuration obtained this way keeps `path` but refuses to be
    /// saved, so the unreadable file is never overwritten.
    pub fn load_or_fallback(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Could not load configuration, using defaults");
            Self {
                path: Some(path.to_path_buf()),
                load_error: Some(e.to_string()),
                ..Self::default()
            }
        })
    }

    /// Fail if saving would overwrite a file that could not be loaded.
    pub fn ensure_writable(&self) -> Result<()> {
        match &self.load_error {
            None => Ok(()),
            Some(error) => {
                let path = self
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "configuration file".to_string());
                Err(CliError::NotPermitted(format!(
                    "{} could not be loaded ({}); fix or remove it before changing profiles",
                    path, error
                )))
            }
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        self.ensure_writable()?;

        let path = match &self.path {
            Some(path) => path.clone(),
            None => Self::default_path()?,
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&OracleConfig> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: OracleConfig) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert("default".to_string(), OracleConfig::full());
        profiles.insert("simple".to_string(), OracleConfig::simple());

        Self {
            active_profile: "default".to_string(),
            profiles,
            settings: Settings::default(),
            path: None,
            load_error: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Pretty,
            history_size: 1000,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Pretty
}

fn default_history_size() -> usize {
    1000
}
