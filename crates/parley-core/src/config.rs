use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ParleyError, Result};

/// Rewrite tables requested on every language/service change.
pub const DEFAULT_REWRITE_TABLES: [&str; 2] = ["Base", "Commands"];

/// Top-level configuration for Parley.
///
/// Loaded from `~/.parley/config.toml` by default. The conversational
/// context table is built in and deliberately not configurable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParleyConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub rewrites: RewritesConfig,
}

impl ParleyConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ParleyConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ParleyError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Speech source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Language the session starts with.
    pub language: String,
    /// Recognition service the session starts with.
    pub service: String,
    /// Maximum number of candidate transcriptions requested per utterance.
    pub max_results: usize,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            service: "default".to_string(),
            max_results: 1,
        }
    }
}

/// Utterance rewrite tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewritesConfig {
    /// Table names requested, in order, whenever rewriters are rebuilt.
    pub tables: Vec<String>,
    /// Table definitions keyed by name. Empty means "use the built-in tables".
    pub definitions: BTreeMap<String, Vec<RewriteRuleConfig>>,
}

impl Default for RewritesConfig {
    fn default() -> Self {
        Self {
            tables: DEFAULT_REWRITE_TABLES.iter().map(|s| s.to_string()).collect(),
            definitions: BTreeMap::new(),
        }
    }
}

/// One row of a rewrite table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRuleConfig {
    /// Regular expression matched against the utterance.
    pub utterance: String,
    /// Replacement text for non-command rules. `$1`-style references allowed.
    #[serde(default)]
    pub replacement: String,
    /// Command id. Only `"activity"` rules produce launchable actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Command arguments; `args[0]` holds the encoded action for `"activity"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Regex restricting the rule to matching languages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Regex restricting the rule to matching recognition services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}
