/// CLI configuration
use crate::error::{CliError, Result};
use encore_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File read when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "encore.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default = "default_simulation")]
    pub simulation: SimulationSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationSettings {
    /// Length reported for every simulated track
    #[serde(default = "default_track_seconds")]
    pub track_seconds: f64,

    /// Interval between `timeupdate` signals
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Events processed before the run stops
    #[serde(default = "default_max_events")]
    pub max_events: usize,

    /// Press play right after the list is loaded
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default `encore.toml` is optional.
    /// Environment variables use the `ENCORE_` prefix and `__` between
    /// sections, e.g. `ENCORE_PLAYER__RETRY_DELAY_MS=500`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ENCORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.player.max_consecutive_errors == 0 {
            return Err(CliError::Config(
                "player.max_consecutive_errors must be at least 1".to_string(),
            ));
        }

        if !self.simulation.track_seconds.is_finite() || self.simulation.track_seconds <= 0.0 {
            return Err(CliError::Config(format!(
                "simulation.track_seconds must be positive, got {}",
                self.simulation.track_seconds
            )));
        }

        if self.simulation.tick_ms == 0 {
            return Err(CliError::Config(
                "simulation.tick_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_simulation() -> SimulationSettings {
    SimulationSettings {
        track_seconds: default_track_seconds(),
        tick_ms: default_tick_ms(),
        max_events: default_max_events(),
        autoplay: default_autoplay(),
    }
}

fn default_track_seconds() -> f64 {
    30.0
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_max_events() -> usize {
    500
}

fn default_autoplay() -> bool {
    true
}

impl Default for SimulationSettings {
    fn default() -> Self {
        default_simulation()
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            simulation: default_simulation(),
        }
    }
}
