use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{CalculationMethod, Coordinates, Madhab, PrayerEvent};

/// The five prayers of one day at one place, in canonical order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub date: NaiveDate,
    pub coordinates: Coordinates,
    pub method: CalculationMethod,
    pub madhab: Madhab,
    events: [PrayerEvent; 5],
}

impl Schedule {
    pub(crate) fn new(
        date: NaiveDate,
        coordinates: Coordinates,
        method: CalculationMethod,
        madhab: Madhab,
        events: [PrayerEvent; 5],
    ) -> Self {
        Self {
            date,
            coordinates,
            method,
            madhab,
            events,
        }
    }

    pub fn events(&self) -> &[PrayerEvent] {
        &self.events
    }

    /// Returns a copy with the notification flag at `index` flipped.
    ///
    /// An index past the end yields an unchanged copy.
    pub fn toggle(&self, index: usize) -> Schedule {
        let mut next = self.clone();
        match next.events.get_mut(index) {
            Some(event) => {
                event.notification_enabled = !event.notification_enabled;
                log::debug!(
                    "{} notifications {}",
                    event.name,
                    if event.notification_enabled { "on" } else { "off" }
                );
            }
            None => log::debug!("toggle index {} out of range, ignored", index),
        }
        next
    }

    pub fn notification_flags(&self) -> [bool; 5] {
        self.events.map(|e| e.notification_enabled)
    }

    /// Copies flags position by position, used when a new day's schedule
    /// replaces the previous one.
    pub fn with_notification_flags(mut self, flags: [bool; 5]) -> Schedule {
        for (event, enabled) in self.events.iter_mut().zip(flags) {
            event.notification_enabled = enabled;
        }
        self
    }

    /// Index and event of the first prayer that has not started yet.
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<(usize, &PrayerEvent)> {
        self.events
            .iter()
            .enumerate()
            .find(|(_, e)| !e.has_started(now))
    }
}
