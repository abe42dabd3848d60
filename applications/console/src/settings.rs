//! Best-effort settings persistence
//!
//! A small JSON document next to the console. Reading never fails: a missing
//! or corrupt file yields defaults. Writes go through a temporary file and a
//! rename so a crash mid-write leaves the previous document intact.

use crate::error::{ConsoleError, Result};
use chrono::{DateTime, Utc};
use lectern_core::{TimerMode, TimerSeed};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Settings that survive a restart
///
/// Unset fields fall back to configuration defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    #[serde(default)]
    pub timer_duration: Option<u64>,

    #[serde(default)]
    pub timer_mode: Option<TimerMode>,

    #[serde(default)]
    pub timezone: Option<String>,

    #[serde(default)]
    pub locale: Option<String>,

    #[serde(default)]
    pub font_size: Option<u32>,

    #[serde(default)]
    pub theme: Option<String>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PersistedSettings {
    /// Whether the document carries anything to seed the timer with
    pub fn has_timer_seed(&self) -> bool {
        self.timer_duration.is_some() || self.timer_mode.is_some() || self.timezone.is_some()
    }

    /// Timer seed for `TimerService::initialize`
    pub fn to_seed(&self) -> TimerSeed {
        TimerSeed {
            mode: self.timer_mode,
            timezone: self.timezone.clone(),
            original_duration: self.timer_duration,
        }
    }
}

/// JSON settings file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings, falling back to defaults
    pub async fn load(&self) -> PersistedSettings {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No settings file, using defaults");
                return PersistedSettings::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read settings");
                return PersistedSettings::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt settings file, using defaults");
                PersistedSettings::default()
            }
        }
    }

    /// Write settings, stamping `updated_at`
    ///
    /// Each write uses its own temporary file in the target directory;
    /// concurrent saves race only on the final rename, which the last one wins.
    pub async fn save(&self, settings: &PersistedSettings) -> Result<()> {
        let mut settings = settings.clone();
        settings.updated_at = Some(Utc::now());
        let json = serde_json::to_vec_pretty(&settings)?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &json))
            .await
            .map_err(|e| ConsoleError::Io(std::io::Error::other(e)))??;

        debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
