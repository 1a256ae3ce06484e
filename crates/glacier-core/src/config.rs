//! Configuration types and loading.
//!
//! Configuration is YAML. [`GlacierConfig::load`] resolves it in this order:
//!
//! 1. an explicit path (fails if the file cannot be read or parsed)
//! 2. `$XDG_CONFIG_HOME/glacier/config.yaml`
//! 3. built-in defaults
//!
//! Every section is optional and falls back to its defaults field by field.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ArchitectError, Result, ResultExt},
    narrator::{NarrationScript, Narrator, DEFAULT_LOG_CAPACITY},
    playback::PlaybackSettings,
};

/// Main Glacier configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlacierConfig {
    /// Generation service connection
    pub generator: GeneratorConfig,

    /// Progress narration shown while synthesizing
    pub narration: NarrationConfig,

    /// Playback animation timing
    pub playback: PlaybackConfig,

    /// Synthesis session behavior
    pub session: SessionConfig,
}

impl GlacierConfig {
    /// Load configuration with fallback chain.
    ///
    /// # Errors
    ///
    /// Returns `ArchitectError::Configuration` if an explicit path cannot be
    /// loaded or the resulting configuration is invalid.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = if let Some(path) = config_path {
            Self::load_from_file(path)?
        } else {
            Self::load_default_location()
        };
        config.validate()?;
        Ok(config)
    }

    fn load_default_location() -> Self {
        let Some(path) = Self::default_config_path() else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reads and parses one configuration file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ArchitectError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = serde_yaml::from_str(&content)
            .with_context(format!("Failed to parse config file {}", path.display()))?;

        info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Existing user configuration file following the XDG Base Directory
    /// specification. Never creates directories.
    pub fn default_config_path() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix("glacier").find_config_file("config.yaml")
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.generator.model.trim().is_empty() {
            return Err(ArchitectError::configuration("generator.model must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.generator.temperature) {
            return Err(ArchitectError::configuration(
                "generator.temperature must be between 0.0 and 2.0",
            ));
        }
        if self.narration.interval_ms == 0 {
            return Err(ArchitectError::configuration("narration.interval-ms must be positive"));
        }
        if !(1..=DEFAULT_LOG_CAPACITY).contains(&self.narration.capacity) {
            return Err(ArchitectError::configuration(format!(
                "narration.capacity must be between 1 and {DEFAULT_LOG_CAPACITY}"
            )));
        }
        if self.playback.period_ms == 0 || self.playback.tick_ms == 0 {
            return Err(ArchitectError::configuration(
                "playback.period-ms and playback.tick-ms must be positive",
            ));
        }
        if self.session.timeout_ms == Some(0) {
            return Err(ArchitectError::configuration("session.timeout-ms must be positive when set"));
        }
        Ok(())
    }
}

/// Generation service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Model identifier
    pub model: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,

    /// HTTP request timeout in milliseconds
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            temperature: 0.2,
            request_timeout_ms: 120_000,
        }
    }
}

/// Narration configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationConfig {
    /// Delay between two narration lines
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,

    /// Number of lines kept in the narration log
    pub capacity: usize,

    /// Lines emitted in order
    pub script: NarrationScript,
}

impl NarrationConfig {
    pub fn narrator(&self) -> Narrator {
        Narrator::new(self.script.clone(), Duration::from_millis(self.interval_ms))
    }
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 600,
            capacity: DEFAULT_LOG_CAPACITY,
            script: NarrationScript::default(),
        }
    }
}

/// Playback animation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Duration of one sweep along an edge
    #[serde(rename = "period-ms")]
    pub period_ms: u64,

    /// Start offset per edge index
    #[serde(rename = "phase-delay-ms")]
    pub phase_delay_ms: u64,

    /// Frame update resolution
    #[serde(rename = "tick-ms")]
    pub tick_ms: u64,
}

impl PlaybackConfig {
    pub fn settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            period: Duration::from_millis(self.period_ms),
            phase_delay: Duration::from_millis(self.phase_delay_ms),
            tick: Duration::from_millis(self.tick_ms),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            period_ms: 2000,
            phase_delay_ms: 400,
            tick_ms: 50,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fail a synthesis whose generation call has not settled after this
    /// many milliseconds. Unset means wait indefinitely.
    #[serde(rename = "timeout-ms", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl SessionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
