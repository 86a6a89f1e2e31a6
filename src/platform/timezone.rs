use chrono::{DateTime, Local, NaiveDate, Utc};
use chrono_tz::Tz;
use std::path::{Path, PathBuf};

use crate::error::DashboardError;
use crate::utils::format::format_clock;

/// Synchronous source of the user's IANA time zone.
pub trait TimezoneResolver {
    fn resolve(&self) -> Result<Tz, DashboardError>;
}

/// Resolves, in order: the configured override, `$TZ`, `/etc/timezone`,
/// then the target of the `/etc/localtime` symlink.
#[derive(Debug, Clone)]
pub struct SystemTimezone {
    override_name: Option<String>,
    timezone_file: PathBuf,
    localtime_link: PathBuf,
}

impl SystemTimezone {
    pub fn new(override_name: Option<String>) -> Self {
        Self {
            override_name,
            timezone_file: PathBuf::from("/etc/timezone"),
            localtime_link: PathBuf::from("/etc/localtime"),
        }
    }

    #[cfg(test)]
    fn with_paths(override_name: Option<String>, timezone_file: &Path, localtime_link: &Path) -> Self {
        Self {
            override_name,
            timezone_file: timezone_file.to_path_buf(),
            localtime_link: localtime_link.to_path_buf(),
        }
    }

    fn candidates(&self) -> Vec<(String, &'static str)> {
        let mut found = Vec::new();
        if let Some(name) = &self.override_name {
            found.push((name.clone(), "config"));
        }
        if let Ok(name) = std::env::var("TZ") {
            // POSIX allows a leading ':' before a zone name.
            found.push((name.trim_start_matches(':').to_string(), "TZ"));
        }
        if let Ok(content) = std::fs::read_to_string(&self.timezone_file) {
            found.push((content.trim().to_string(), "/etc/timezone"));
        }
        if let Some(name) = zone_from_link(&self.localtime_link) {
            found.push((name, "/etc/localtime"));
        }
        found
    }
}

impl TimezoneResolver for SystemTimezone {
    fn resolve(&self) -> Result<Tz, DashboardError> {
        let candidates = self.candidates();
        for (name, source) in &candidates {
            match name.parse::<Tz>() {
                Ok(tz) => {
                    log::debug!("timezone {} from {}", tz.name(), source);
                    return Ok(tz);
                }
                Err(_) => log::warn!("ignoring unknown timezone '{}' from {}", name, source),
            }
        }
        Err(DashboardError::Timezone(if candidates.is_empty() {
            "no timezone source available".to_string()
        } else {
            format!("{} candidate(s), none recognised", candidates.len())
        }))
    }
}

/// "/usr/share/zoneinfo/Europe/London" -> "Europe/London"
fn zone_from_link(link: &Path) -> Option<String> {
    let target = std::fs::read_link(link).ok()?;
    let target = target.to_string_lossy();
    let (_, name) = target.split_once("zoneinfo/")?;
    Some(name.to_string())
}

/// The zone prayer times are shown in: the resolved IANA zone, or the
/// system's local offset until (or unless) one is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplayZone(Option<Tz>);

impl DisplayZone {
    pub fn named(tz: Tz) -> Self {
        Self(Some(tz))
    }

    pub fn local() -> Self {
        Self(None)
    }

    pub fn name(&self) -> Option<&'static str> {
        self.0.map(|tz| tz.name())
    }

    /// Calendar date of `now` in this zone.
    pub fn date_of(&self, now: DateTime<Utc>) -> NaiveDate {
        match self.0 {
            Some(tz) => now.with_timezone(&tz).date_naive(),
            None => now.with_timezone(&Local).date_naive(),
        }
    }

    pub fn clock(&self, instant: DateTime<Utc>) -> String {
        match self.0 {
            Some(tz) => format_clock(&instant.with_timezone(&tz)),
            None => format_clock(&instant.with_timezone(&Local)),
        }
    }
}
