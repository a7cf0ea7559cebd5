use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diff::TieBreak;
use crate::engine::{ChoiceMode, ParseOptions};
use crate::history::RowOrder;
use crate::util::paths::config_path;

use super::ConfigError;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Binding whose expression is reduced
    pub entry: String,
    /// Which choices are offered at each state
    pub mode: ChoiceMode,
    /// Order of the history pane
    pub order: RowOrder,
    /// Placement of ambiguous hinted changes
    pub tie_break: TieBreak,
    pub theme: ThemeConfig,
}

/// Color names as written in the config file; resolved by the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    pub changed: String,
    pub removed: String,
    pub similar: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            changed: "green".into(),
            removed: "red".into(),
            similar: "reset".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry: ParseOptions::default().entry,
            mode: ChoiceMode::default(),
            order: RowOrder::default(),
            tie_break: TieBreak::default(),
            theme: ThemeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlEngineConfig {
    pub entry: Option<String>,
    pub mode: Option<ChoiceMode>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlHistoryConfig {
    pub order: Option<RowOrder>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlDiffConfig {
    pub tie_break: Option<TieBreak>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlThemeConfig {
    pub changed: Option<String>,
    pub removed: Option<String>,
    pub similar: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub engine: Option<TomlEngineConfig>,
    pub history: Option<TomlHistoryConfig>,
    pub diff: Option<TomlDiffConfig>,
    pub theme: Option<TomlThemeConfig>,
}

impl Config {
    /// Load `~/.retrace/config.toml`, writing the example file on first run.
    ///
    /// An unreadable or invalid file is logged and the defaults are used.
    pub fn load() -> Self {
        let config_file = config_path();

        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        match Self::load_from(&config_file) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring config file");
                Config::default()
            }
        }
    }

    /// Load an explicit config file; a missing file is an error
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// Parse TOML and merge it over the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_config: TomlConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse {
                path: None,
                message: e.to_string(),
            })?;

        let mut config = Config::default();

        if let Some(engine) = toml_config.engine {
            if let Some(entry) = engine.entry {
                if entry.trim().is_empty() {
                    return Err(ConfigError::Invalid("engine.entry must not be empty".into()));
                }
                config.entry = entry;
            }
            if let Some(mode) = engine.mode {
                config.mode = mode;
            }
        }

        if let Some(order) = toml_config.history.and_then(|h| h.order) {
            config.order = order;
        }

        if let Some(tie_break) = toml_config.diff.and_then(|d| d.tie_break) {
            config.tie_break = tie_break;
        }

        if let Some(theme) = toml_config.theme {
            if let Some(changed) = theme.changed {
                config.theme.changed = changed;
            }
            if let Some(removed) = theme.removed {
                config.theme.removed = removed;
            }
            if let Some(similar) = theme.similar {
                config.theme.similar = similar;
            }
        }

        Ok(config)
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            entry: self.entry.clone(),
        }
    }

    fn create_default_config(path: &PathBuf) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }
}
