use patternflow_editor::DEFAULT_MAX_LEVELS;
use patternflow_model::ViewContext;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "patternflow.config.json";

/// Patternflow configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Language used when printing localized titles
    #[serde(default = "default_language")]
    pub language: String,

    /// Maximum undo depth of an edit session (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Viewing context for `visibility` when none is given
    #[serde(default)]
    pub context: ViewContext,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_MAX_LEVELS
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = Self::path(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn path(cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            history_limit: default_history_limit(),
            context: ViewContext::default(),
        }
    }
}
