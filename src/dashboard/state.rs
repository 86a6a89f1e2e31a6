use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::dashboard::ToastQueue;
use crate::error::DashboardError;
use crate::models::{CalculationMethod, Coordinates, Madhab, PrayerEvent, Schedule};
use crate::platform::DisplayZone;
use crate::prayer_times::{PrayerTimeEngine, build_schedule};

pub const FETCHING_LOCATION: &str = "Fetching location...";

/// Everything the dashboard shows, independent of any terminal.
///
/// Inputs arrive as calls (`on_location`, `on_timezone`, `tick`) carrying an
/// explicit `now`, so every transition can be driven from tests.
pub struct DashboardState {
    engine: Box<dyn PrayerTimeEngine>,
    method: CalculationMethod,
    madhab: Madhab,
    location: Option<Coordinates>,
    zone: DisplayZone,
    schedule: Option<Schedule>,
    // Date whose build last failed; not retried on every tick.
    failed_for: Option<NaiveDate>,
    toasts: ToastQueue,
}

impl DashboardState {
    pub fn new(
        engine: Box<dyn PrayerTimeEngine>,
        method: CalculationMethod,
        madhab: Madhab,
        toast_ttl: Duration,
    ) -> Self {
        Self {
            engine,
            method,
            madhab,
            location: None,
            zone: DisplayZone::local(),
            schedule: None,
            failed_for: None,
            toasts: ToastQueue::new(toast_ttl),
        }
    }

    pub fn on_timezone(&mut self, result: Result<Tz, DashboardError>, now: DateTime<Utc>) {
        match result {
            Ok(tz) => {
                log::info!("display zone {}", tz.name());
                self.zone = DisplayZone::named(tz);
                // "Today" may differ in the new zone.
                self.rebuild_if_stale(now);
            }
            Err(err) => self.toasts.push_error(&err, now),
        }
    }

    pub fn on_location(&mut self, result: Result<Coordinates, DashboardError>, now: DateTime<Utc>) {
        match result {
            Ok(coords) => {
                log::info!("location {}", coords.describe());
                self.location = Some(coords);
                self.rebuild(now, None);
            }
            Err(err) => self.toasts.push_error(&err, now),
        }
    }

    /// Periodic refresh: drop expired toasts and follow the calendar.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        self.toasts.expire(now);
        self.rebuild_if_stale(now);
    }

    fn rebuild_if_stale(&mut self, now: DateTime<Utc>) {
        let today = self.zone.date_of(now);
        if let Some(schedule) = &self.schedule {
            if schedule.date != today && self.failed_for != Some(today) {
                log::info!("date changed {} -> {}, rebuilding", schedule.date, today);
                let flags = schedule.notification_flags();
                self.rebuild(now, Some(flags));
            }
        }
    }

    /// On failure the previous schedule (if any) stays in place.
    fn rebuild(&mut self, now: DateTime<Utc>, carry_flags: Option<[bool; 5]>) {
        let Some(coords) = self.location else {
            return;
        };
        let date = self.zone.date_of(now);
        match build_schedule(self.engine.as_ref(), coords, date, self.method, self.madhab) {
            Ok(schedule) => {
                self.failed_for = None;
                self.schedule = Some(match carry_flags {
                    Some(flags) => schedule.with_notification_flags(flags),
                    None => schedule,
                });
            }
            Err(err) => {
                self.failed_for = Some(date);
                self.toasts.push_error(&err, now);
            }
        }
    }

    pub fn toggle_notification(&mut self, index: usize) {
        if let Some(schedule) = &self.schedule {
            self.schedule = Some(schedule.toggle(index));
        }
    }

    pub fn prayers(&self) -> &[PrayerEvent] {
        self.schedule.as_ref().map(|s| s.events()).unwrap_or(&[])
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    pub fn location_text(&self) -> String {
        match self.location {
            Some(coords) => coords.describe(),
            None => FETCHING_LOCATION.to_string(),
        }
    }

    pub fn zone(&self) -> DisplayZone {
        self.zone
    }

    pub fn method(&self) -> CalculationMethod {
        self.method
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }
}
