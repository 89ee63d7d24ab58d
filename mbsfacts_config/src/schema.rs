use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// Reuse the extraction crate's own config type to avoid duplication.
use mbsfacts_extraction::ExtractionConfig;

/// Application configuration, stored as JSON at `~/.mbsfacts/config.json`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Controls how the load summary is reported.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OutputConfig {
    /// How many frequency-table rows the summary logs per fact kind.
    #[serde(default = "OutputConfig::default_top_patterns")]
    pub top_patterns: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            top_patterns: Self::default_top_patterns(),
        }
    }
}

impl OutputConfig {
    const fn default_top_patterns() -> usize {
        10
    }
}

impl Config {
    /// Load the configuration file.
    ///
    /// # Errors
    /// Fails when the file is missing (run `mbsfacts init` first) or is not
    /// valid JSON.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");

        if !config_path.exists() {
            anyhow::bail!(
                "Config file not found at: {}. Please run 'mbsfacts init' to create config.",
                config_path.display()
            );
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Load the configuration file, falling back to defaults when absent.
    ///
    /// # Errors
    /// Fails only when a present file cannot be read or parsed.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let config_path = Self::config_dir()?.join("config.json");
        if !config_path.exists() {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Create the config directory if needed and return its path.
    pub fn ensure_config_dir() -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }

    /// Write a default config file, leaving an existing one untouched.
    pub fn create_config() -> anyhow::Result<()> {
        let config_dir = Self::ensure_config_dir()?;
        let config_path = config_dir.join("config.json");

        if config_path.exists() {
            tracing::info!("Config already exists at {}", config_path.display());
            return Ok(());
        }

        let content = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(&config_path, content)?;
        tracing::info!("Created config at {}", config_path.display());
        Ok(())
    }

    fn config_dir() -> anyhow::Result<PathBuf> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
        Ok(home_dir.join(".mbsfacts"))
    }
}
