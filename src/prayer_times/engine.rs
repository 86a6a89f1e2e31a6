use chrono::{DateTime, Datelike, NaiveDate, Utc};
use salah::prelude::*;
use std::f64::consts::PI;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use crate::error::DashboardError;
use crate::models::{CalculationMethod, Coordinates, Madhab as SchoolOfThought, PrayerName};

/// Raw instants for the five prayers of one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrayerInstants {
    pub fajr: DateTime<Utc>,
    pub dhuhr: DateTime<Utc>,
    pub asr: DateTime<Utc>,
    pub maghrib: DateTime<Utc>,
    pub isha: DateTime<Utc>,
}

impl PrayerInstants {
    pub fn get(&self, name: PrayerName) -> DateTime<Utc> {
        match name {
            PrayerName::Fajr => self.fajr,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }
}

/// Astronomical calculation, treated as a pure function of its inputs.
pub trait PrayerTimeEngine {
    fn calculate(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
        method: CalculationMethod,
        madhab: SchoolOfThought,
    ) -> Result<PrayerInstants, DashboardError>;
}

/// Offline engine backed by the `salah` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalahEngine;

/// Standard refraction-corrected altitude of the sun at sunrise and sunset.
const SUNRISE_ALTITUDE: f64 = -0.8333;

/// Twilight angles closer than this to the sun's deepest point are treated as
/// unreachable; salah's hour-angle refinement breaks down right at the bottom.
const REACH_MARGIN: f64 = 0.25;

/// Headroom kept between a clamped twilight angle and the sun's deepest point.
const TWILIGHT_MARGIN: f64 = 1.5;

/// Degrees of longitude equal to 36 seconds of solar time.
const MIDNIGHT_NUDGE: f64 = 0.15;

static PANIC_HOOK: Mutex<()> = Mutex::new(());

impl PrayerTimeEngine for SalahEngine {
    fn calculate(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
        method: CalculationMethod,
        madhab: SchoolOfThought,
    ) -> Result<PrayerInstants, DashboardError> {
        let latitude = coordinates.latitude();
        let mut params = Configuration::with(to_salah_method(method), to_salah_madhab(madhab));

        // salah also evaluates the following day for the length of the night.
        let days = [date, date.succ_opt().unwrap_or(date)];
        let mut deepest = f64::INFINITY;
        for day in days {
            let declination = solar_declination(day);
            if !sun_reaches(latitude, declination, SUNRISE_ALTITUDE) {
                return Err(DashboardError::Calculation(format!(
                    "the sun does not rise and set at latitude {:.4} on {}",
                    latitude, day
                )));
            }
            deepest = deepest.min(max_depression(latitude, declination));
        }

        // Twilight that never ends: fall back to the darkest reachable angle
        // and let salah's night-portion rule take over.
        let reachable = deepest - REACH_MARGIN;
        let limit = (deepest - TWILIGHT_MARGIN).max(deepest / 2.0);
        if params.fajr_angle > reachable {
            log::debug!("fajr angle {} clamped to {:.2}", params.fajr_angle, limit);
            params.fajr_angle = limit;
        }
        if params.isha_interval == 0 && params.isha_angle > reachable {
            log::debug!("isha angle {} clamped to {:.2}", params.isha_angle, limit);
            params.isha_angle = limit;
        }

        let run = |longitude: f64| {
            let location = salah::prelude::Coordinates::new(latitude, longitude);
            quietly(|| {
                PrayerSchedule::new()
                    .on(date)
                    .for_location(location)
                    .with_configuration(params)
                    .calculate()
            })
        };
        // salah cannot represent a time that rounds up to 24:00 UTC. Shifting
        // the longitude moves every time by 36 s, clear of that window.
        let longitude = coordinates.longitude();
        let times = run(longitude)
            .or_else(|| {
                log::debug!(
                    "retrying {} at {:.4},{:.4} with a nudged longitude",
                    date,
                    latitude,
                    longitude
                );
                run(longitude - MIDNIGHT_NUDGE.copysign(longitude))
            })
            .ok_or_else(|| {
                DashboardError::Calculation(format!(
                    "no solution at latitude {:.4} on {}",
                    latitude, date
                ))
            })?
            .map_err(|e| DashboardError::Calculation(e.to_string()))?;

        Ok(PrayerInstants {
            fajr: times.time(Prayer::Fajr),
            dhuhr: times.time(Prayer::Dhuhr),
            asr: times.time(Prayer::Asr),
            maghrib: times.time(Prayer::Maghrib),
            isha: times.time(Prayer::Isha),
        })
    }
}

/// Runs `f`, turning a panic into `None` without printing it. The hook swap
/// keeps the terminal-restoring hook installed by the dashboard from firing.
fn quietly<T>(f: impl FnOnce() -> T) -> Option<T> {
    let _guard = PANIC_HOOK.lock().unwrap_or_else(|e| e.into_inner());
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    panic::set_hook(previous);
    result.ok()
}

/// Declination of the sun in degrees at 00:00 UTC on `date`.
fn solar_declination(date: NaiveDate) -> f64 {
    let days_in_year = if date.leap_year() { 366.0 } else { 365.0 };
    let g = 2.0 * PI / days_in_year * (date.ordinal0() as f64 - 0.5);
    let radians = 0.006918 - 0.399912 * g.cos() + 0.070257 * g.sin() - 0.006758 * (2.0 * g).cos()
        + 0.000907 * (2.0 * g).sin()
        - 0.002697 * (3.0 * g).cos()
        + 0.00148 * (3.0 * g).sin();
    radians.to_degrees()
}

/// Whether the sun crosses `altitude` at some point of the day.
fn sun_reaches(latitude: f64, declination: f64, altitude: f64) -> bool {
    let (lat, dec) = (latitude.to_radians(), declination.to_radians());
    let cos_hour_angle =
        (altitude.to_radians().sin() - lat.sin() * dec.sin()) / (lat.cos() * dec.cos());
    cos_hour_angle.is_finite() && cos_hour_angle.abs() <= 1.0
}

/// Degrees below the horizon at the sun's lowest point.
fn max_depression(latitude: f64, declination: f64) -> f64 {
    90.0 - (latitude + declination).abs()
}

fn to_salah_method(method: CalculationMethod) -> Method {
    match method {
        CalculationMethod::MuslimWorldLeague => Method::MuslimWorldLeague,
        CalculationMethod::Egyptian => Method::Egyptian,
        CalculationMethod::Karachi => Method::Karachi,
        CalculationMethod::UmmAlQura => Method::UmmAlQura,
        CalculationMethod::Dubai => Method::Dubai,
        CalculationMethod::MoonsightingCommittee => Method::MoonsightingCommittee,
        CalculationMethod::NorthAmerica => Method::NorthAmerica,
        CalculationMethod::Kuwait => Method::Kuwait,
        CalculationMethod::Qatar => Method::Qatar,
        CalculationMethod::Singapore => Method::Singapore,
        CalculationMethod::Tehran => Method::Tehran,
        CalculationMethod::Turkey => Method::Turkey,
    }
}

fn to_salah_madhab(madhab: SchoolOfThought) -> Madhab {
    match madhab {
        SchoolOfThought::Shafi => Madhab::Shafi,
        SchoolOfThought::Hanafi => Madhab::Hanafi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mecca() -> Coordinates {
        Coordinates::new(21.4225, 39.8262).unwrap()
    }

    #[test]
    fn salah_engine_produces_times_on_the_requested_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let times = SalahEngine
            .calculate(
                mecca(),
                date,
                CalculationMethod::UmmAlQura,
                SchoolOfThought::Shafi,
            )
            .unwrap();

        // Mecca is UTC+3; Dhuhr falls shortly after noon local time.
        let dhuhr_utc_hour = times.dhuhr.format("%H").to_string();
        assert_eq!(dhuhr_utc_hour, "09");
        assert!(times.fajr < times.dhuhr);
    }

    #[test]
    fn hanafi_asr_is_later_than_shafi_asr() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let shafi = SalahEngine
            .calculate(
                mecca(),
                date,
                CalculationMethod::MuslimWorldLeague,
                SchoolOfThought::Shafi,
            )
            .unwrap();
        let hanafi = SalahEngine
            .calculate(
                mecca(),
                date,
                CalculationMethod::MuslimWorldLeague,
                SchoolOfThought::Hanafi,
            )
            .unwrap();

        assert!(hanafi.asr > shafi.asr);
        assert_eq!(hanafi.fajr, shafi.fajr);
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn polar_day_and_night_are_calculation_errors() {
        let cases = [
            (66.0, day(6, 21)),
            (70.0, day(6, 21)),
            (70.0, day(12, 21)),
            (-70.0, day(6, 21)),
            (78.2, day(6, 21)),
            (78.2, day(12, 21)),
            (89.0, day(6, 21)),
            (89.0, day(12, 21)),
            (90.0, day(3, 20)),
            (90.0, day(6, 21)),
            (90.0, day(12, 21)),
            (-90.0, day(3, 20)),
            (-90.0, day(6, 21)),
            (-90.0, day(12, 21)),
        ];
        for (lat, date) in cases {
            let result = SalahEngine.calculate(
                Coordinates::new(lat, 15.0).unwrap(),
                date,
                CalculationMethod::MuslimWorldLeague,
                SchoolOfThought::Shafi,
            );
            assert!(
                matches!(result, Err(DashboardError::Calculation(_))),
                "lat={} date={}: {:?}",
                lat,
                date,
                result
            );
        }
    }

    #[test]
    fn endless_summer_twilight_still_orders_the_day() {
        let cases = [
            (51.5, -0.12, day(6, 21)),
            (59.33, 18.07, day(6, 21)),
            (78.2, 15.6, day(3, 20)),
        ];
        for (lat, lon, date) in cases {
            let times = SalahEngine
                .calculate(
                    Coordinates::new(lat, lon).unwrap(),
                    date,
                    CalculationMethod::MuslimWorldLeague,
                    SchoolOfThought::Shafi,
                )
                .unwrap();
            assert!(times.fajr < times.dhuhr, "lat={}: {:?}", lat, times);
            assert!(times.dhuhr < times.asr);
            assert!(times.asr < times.maghrib);
            assert!(times.maghrib < times.isha, "lat={}: {:?}", lat, times);
        }
    }

    #[test]
    fn declination_tracks_the_solstices() {
        assert!((solar_declination(day(6, 21)) - 23.44).abs() < 0.2);
        assert!((solar_declination(day(12, 21)) + 23.44).abs() < 0.2);
        assert!(solar_declination(day(3, 20)).abs() < 0.6);
    }
}
