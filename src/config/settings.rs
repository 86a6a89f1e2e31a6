use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{CalculationMethod, Madhab};

fn default_hijri_offset() -> i32 {
    0
}
fn default_tick_rate_ms() -> u64 {
    1000
}
fn default_toast_secs() -> u64 {
    5
}
/// Fastest redraw the input thread will poll at.
pub const MIN_TICK_RATE_MS: u64 = 50;
const MAX_TICK_RATE_MS: u64 = 60_000;
const MAX_TOAST_SECS: u64 = 3600;

fn default_dial_code() -> String {
    "1".to_string()
}
fn default_login_delay_ms() -> u64 {
    2000
}

/// Where the device is. Both coordinates must be present for a location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculationConfig {
    #[serde(default)]
    pub method: CalculationMethod,
    #[serde(default)]
    pub madhab: Madhab,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// IANA zone overriding system detection, e.g. "Asia/Karachi".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Days to add/subtract from Hijri date for local moon sighting.
    #[serde(default = "default_hijri_offset")]
    pub hijri_offset: i32,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: None,
            hijri_offset: default_hijri_offset(),
            tick_rate_ms: default_tick_rate_ms(),
            toast_secs: default_toast_secs(),
        }
    }
}

impl DisplayConfig {
    /// Rejects a toast lifetime outside 1..=3600 seconds and pulls the tick
    /// rate into a range the input thread can poll at.
    fn validate(&mut self) -> Result<()> {
        if !(1..=MAX_TOAST_SECS).contains(&self.toast_secs) {
            bail!(
                "display.toast_secs = {} is out of range (1..={})",
                self.toast_secs,
                MAX_TOAST_SECS
            );
        }
        let clamped = self.tick_rate_ms.clamp(MIN_TICK_RATE_MS, MAX_TICK_RATE_MS);
        if clamped != self.tick_rate_ms {
            log::warn!("display.tick_rate_ms = {} clamped to {}", self.tick_rate_ms, clamped);
            self.tick_rate_ms = clamped;
        }
        Ok(())
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.clamp(MIN_TICK_RATE_MS, MAX_TICK_RATE_MS))
    }

    pub fn toast_ttl(&self) -> chrono::Duration {
        i64::try_from(self.toast_secs.min(MAX_TOAST_SECS))
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or_else(|| chrono::Duration::seconds(default_toast_secs() as i64))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Dial code prefixed to numbers typed without a leading '+'.
    #[serde(default = "default_dial_code")]
    pub default_dial_code: String,
    #[serde(default = "default_login_delay_ms")]
    pub login_delay_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_dial_code: default_dial_code(),
            login_delay_ms: default_login_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub calculation: CalculationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("", "", "miqat").context("Could not determine project directories")
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn db_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("miqat.db"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("miqat.log"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
        let mut config: AppConfig = toml::from_str(&content).context("Parsing config.toml")?;
        config
            .display
            .validate()
            .with_context(|| format!("Invalid settings in {:?}", path))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).context("Serializing config")?;
        std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
        Ok(())
    }

    pub fn ensure_data_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
