/// Console configuration
use crate::error::{ConsoleError, Result};
use lectern_core::{TimerMode, DEFAULT_TIMER_DURATION_SECS, DEFAULT_TIMEZONE};
use lectern_timer::TimerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "lectern.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_timer")]
    pub timer: TimerSettings,

    #[serde(default = "default_projection")]
    pub projection: ProjectionSettings,

    #[serde(default = "default_settings")]
    pub settings: SettingsFile,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimerSettings {
    /// Internal tick resolution
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_duration_secs")]
    pub default_duration_secs: u64,

    #[serde(default)]
    pub default_mode: TimerMode,

    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectionSettings {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Origin stamped on (and required of) fallback `postMessage` traffic
    #[serde(default = "default_origin")]
    pub origin: String,

    /// How long visibility toggles wait for a projection window
    #[serde(default = "default_window_ready_timeout_ms")]
    pub window_ready_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettingsFile {
    #[serde(default = "default_settings_path")]
    pub path: PathBuf,
}

impl ConsoleConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `lectern.toml`; a missing default file is
    /// fine, a missing explicit one is not.
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

        // Override with environment variables (LECTERN_TIMER__TICK_INTERVAL_MS=...)
        settings = settings.add_source(
            config::Environment::with_prefix("LECTERN")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.timer.tick_interval_ms == 0 {
            return Err(ConsoleError::Config(
                "timer.tick_interval_ms must be greater than zero".to_string(),
            ));
        }

        if self.projection.debounce_ms == 0 {
            return Err(ConsoleError::Config(
                "projection.debounce_ms must be greater than zero".to_string(),
            ));
        }

        if self.projection.origin.trim().is_empty() {
            return Err(ConsoleError::Config(
                "projection.origin is required (set LECTERN_PROJECTION__ORIGIN)".to_string(),
            ));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timer.tick_interval_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.projection.debounce_ms)
    }

    pub fn window_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.projection.window_ready_timeout_ms)
    }

    /// Initial timer machine settings
    pub fn timer_config(&self) -> TimerConfig {
        TimerConfig {
            default_duration_secs: self.timer.default_duration_secs,
            default_mode: self.timer.default_mode,
            default_timezone: self.timer.default_timezone.clone(),
        }
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    7420
}

fn default_timer() -> TimerSettings {
    TimerSettings {
        tick_interval_ms: default_tick_interval_ms(),
        default_duration_secs: default_duration_secs(),
        default_mode: TimerMode::default(),
        default_timezone: default_timezone(),
    }
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_duration_secs() -> u64 {
    DEFAULT_TIMER_DURATION_SECS
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_projection() -> ProjectionSettings {
    ProjectionSettings {
        debounce_ms: default_debounce_ms(),
        origin: default_origin(),
        window_ready_timeout_ms: default_window_ready_timeout_ms(),
    }
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_origin() -> String {
    format!("http://{}:{}", default_host(), default_port())
}

fn default_window_ready_timeout_ms() -> u64 {
    500
}

fn default_settings() -> SettingsFile {
    SettingsFile {
        path: default_settings_path(),
    }
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("./data/settings.json")
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            timer: default_timer(),
            projection: default_projection(),
            settings: default_settings(),
        }
    }
}
