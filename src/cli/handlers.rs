use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::config::AppConfig;
use crate::db::repository::SessionRepo;
use crate::models::{PrayerName, Schedule};
use crate::platform::{DisplayZone, LocationProvider, SystemTimezone, TimezoneResolver};
use crate::prayer_times::{SalahEngine, build_schedule};
use crate::utils::format::time_remaining;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;204;170;84m";

// ─── Login / logout ──────────────────────────────────────────────────────────

pub fn handle_login(conn: &Connection, config: &AppConfig, register: bool) -> Result<()> {
    match crate::cli::login_tui::run_login_tui(conn, config, register)? {
        Some(session) => println_colored!(GREEN, "  ✓ Signed in as {}", session.phone),
        None => println_colored!(DIM, "  Login cancelled"),
    }
    Ok(())
}

pub fn handle_logout(conn: &Connection) -> Result<()> {
    if SessionRepo::clear(conn)? {
        log::info!("session cleared");
        println_colored!(GREEN, "  ✓ Signed out");
    } else {
        println_colored!(DIM, "  Not signed in");
    }
    Ok(())
}

// ─── Times ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct TimesReport {
    date: String,
    timezone: Option<&'static str>,
    latitude: f64,
    longitude: f64,
    method: String,
    madhab: String,
    prayers: Vec<PrayerReport>,
}

#[derive(Debug, Serialize)]
struct PrayerReport {
    name: &'static str,
    start_time: String,
    local_time: String,
    remaining: String,
    notification_enabled: bool,
}

fn report(
    schedule: &Schedule,
    zone: DisplayZone,
    now: DateTime<Utc>,
    only: Option<PrayerName>,
) -> TimesReport {
    TimesReport {
        date: schedule.date.format("%Y-%m-%d").to_string(),
        timezone: zone.name(),
        latitude: schedule.coordinates.latitude(),
        longitude: schedule.coordinates.longitude(),
        method: schedule.method.to_string(),
        madhab: schedule.madhab.as_str().to_string(),
        prayers: schedule
            .events()
            .iter()
            .filter(|e| only.is_none_or(|name| e.name == name))
            .map(|e| PrayerReport {
                name: e.name.display_name(),
                start_time: e.start_time.to_rfc3339(),
                local_time: zone.clock(e.start_time),
                remaining: time_remaining(now, e.start_time),
                notification_enabled: e.notification_enabled,
            })
            .collect(),
    }
}

pub fn handle_times(
    config: &AppConfig,
    provider: &dyn LocationProvider,
    json: bool,
    only: Option<PrayerName>,
) -> Result<()> {
    let now = Utc::now();
    let coords = provider.locate().map_err(|e| anyhow!("{}: {}", e.description(), e))?;

    let zone = match SystemTimezone::new(config.display.timezone.clone()).resolve() {
        Ok(tz) => DisplayZone::named(tz),
        Err(e) => {
            log::warn!("{}", e);
            DisplayZone::local()
        }
    };

    let schedule = build_schedule(
        &SalahEngine,
        coords,
        zone.date_of(now),
        config.calculation.method,
        config.calculation.madhab,
    )
    .map_err(|e| anyhow!("{}: {}", e.description(), e))?;

    let report = report(&schedule, zone, now, only);

    if json {
        let out = serde_json::to_string_pretty(&report).context("Serializing prayer times")?;
        println!("{}", out);
        return Ok(());
    }

    let place = config
        .location
        .name
        .clone()
        .unwrap_or_else(|| coords.describe());

    println!();
    println_colored!(GOLD, "  Prayer Times · {} ({})", place, report.date);
    if let Some(tz) = report.timezone {
        println_colored!(DIM, "  {} · {}", tz, report.method);
    }
    println!();

    for prayer in &report.prayers {
        let line = format!("  {:<8}  {}   {}", prayer.name, prayer.local_time, prayer.remaining);
        if prayer.remaining == "Started" {
            println_colored!(DIM, "{}", line);
        } else {
            println_colored!(BOLD, "{}", line);
        }
    }

    if only.is_some() {
        println!();
        return Ok(());
    }

    if let Some((_, next)) = schedule.next_after(now) {
        println!();
        println_colored!(
            AMBER,
            "  Next: {} in {}",
            next.name.display_name(),
            time_remaining(now, next.start_time).trim_end_matches(" remaining")
        );
    }
    println!();
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path()?;

    if init {
        if path.exists() {
            println_colored!(DIM, "  Config already exists at {}", path.display());
        } else {
            config.save_to(&path)?;
            println_colored!(GREEN, "  ✓ Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    let rendered = toml::to_string_pretty(config).context("Serializing config")?;
    println!();
    println_colored!(GOLD, "  {}", path.display());
    if !path.exists() {
        println_colored!(DIM, "  (not created yet; showing defaults, run `miqat config --init`)");
    }
    println!();
    for line in rendered.lines() {
        println!("  {}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalculationMethod, Coordinates, Madhab};
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn report_serializes_every_prayer() {
        let schedule = build_schedule(
            &SalahEngine,
            Coordinates::new(21.4225, 39.8262).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            CalculationMethod::UmmAlQura,
            Madhab::Shafi,
        )
        .unwrap();
        let zone = DisplayZone::named(chrono_tz::Asia::Riyadh);
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 5, 0, 0).unwrap();

        let value = serde_json::to_value(report(&schedule, zone, now, None)).unwrap();

        assert_eq!(value["date"], "2024-03-20");
        assert_eq!(value["timezone"], "Asia/Riyadh");
        assert_eq!(value["latitude"], 21.4225);
        let prayers = value["prayers"].as_array().unwrap();
        assert_eq!(prayers.len(), 5);
        assert_eq!(prayers[0]["name"], "Fajr");
        assert_eq!(prayers[0]["remaining"], "Started");
        assert!(prayers[1]["remaining"].as_str().unwrap().ends_with("remaining"));
        assert!(prayers[4]["start_time"].as_str().unwrap().starts_with("2024-03-20T"));
        assert!(prayers[0]["local_time"].as_str().unwrap().ends_with("AM"));

        let only_asr = report(&schedule, zone, now, Some(PrayerName::Asr));
        assert_eq!(only_asr.prayers.len(), 1);
        assert_eq!(only_asr.prayers[0].name, "Asr");
    }
}
