use chrono::NaiveDate;

use crate::error::DashboardError;
use crate::models::{CalculationMethod, Coordinates, Madhab, PrayerEvent, PrayerName, Schedule};
use crate::prayer_times::engine::PrayerTimeEngine;

/// Build the day's schedule with every notification enabled.
///
/// Fails with [`DashboardError::Calculation`] if the engine errors or hands
/// back times that are not strictly increasing in canonical order.
pub fn build_schedule<E: PrayerTimeEngine + ?Sized>(
    engine: &E,
    coordinates: Coordinates,
    date: NaiveDate,
    method: CalculationMethod,
    madhab: Madhab,
) -> Result<Schedule, DashboardError> {
    let instants = engine.calculate(coordinates, date, method, madhab)?;
    let events = PrayerName::ALL.map(|name| PrayerEvent::new(name, instants.get(name)));

    if let Some(pair) = events.windows(2).find(|w| w[0].start_time >= w[1].start_time) {
        return Err(DashboardError::Calculation(format!(
            "{} ({}) is not before {} ({})",
            pair[0].name, pair[0].start_time, pair[1].name, pair[1].start_time
        )));
    }

    log::debug!(
        "built schedule for {} at {:.4},{:.4} using {}",
        date,
        coordinates.latitude(),
        coordinates.longitude(),
        method
    );
    Ok(Schedule::new(date, coordinates, method, madhab, events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prayer_times::engine::{PrayerInstants, SalahEngine};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn cairo() -> Coordinates {
        Coordinates::new(30.0444, 31.2357).unwrap()
    }

    fn equinox() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    struct FixedEngine(PrayerInstants);

    impl PrayerTimeEngine for FixedEngine {
        fn calculate(
            &self,
            _: Coordinates,
            _: NaiveDate,
            _: CalculationMethod,
            _: Madhab,
        ) -> Result<PrayerInstants, DashboardError> {
            Ok(self.0)
        }
    }

    struct FailingEngine;

    impl PrayerTimeEngine for FailingEngine {
        fn calculate(
            &self,
            _: Coordinates,
            _: NaiveDate,
            _: CalculationMethod,
            _: Madhab,
        ) -> Result<PrayerInstants, DashboardError> {
            Err(DashboardError::Calculation("engine exploded".into()))
        }
    }

    #[test]
    fn five_events_in_canonical_order() {
        let schedule = build_schedule(
            &SalahEngine,
            cairo(),
            equinox(),
            CalculationMethod::MuslimWorldLeague,
            Madhab::Shafi,
        )
        .unwrap();

        let names: Vec<PrayerName> = schedule.events().iter().map(|e| e.name).collect();
        assert_eq!(names, PrayerName::ALL.to_vec());
        assert!(schedule
            .events()
            .windows(2)
            .all(|w| w[0].start_time < w[1].start_time));
        assert!(schedule.events().iter().all(|e| e.notification_enabled));
        assert_eq!(schedule.date, equinox());
    }

    #[test]
    fn identical_inputs_give_identical_times() {
        let build = || {
            build_schedule(
                &SalahEngine,
                cairo(),
                equinox(),
                CalculationMethod::NorthAmerica,
                Madhab::Hanafi,
            )
            .unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn engine_failure_is_a_calculation_error() {
        let err = build_schedule(
            &FailingEngine,
            cairo(),
            equinox(),
            CalculationMethod::MuslimWorldLeague,
            Madhab::Shafi,
        )
        .unwrap_err();
        assert!(matches!(err, DashboardError::Calculation(_)));
    }

    #[test]
    fn out_of_order_engine_output_is_rejected() {
        let at = |h| Utc.with_ymd_and_hms(2024, 3, 20, h, 0, 0).unwrap();
        let engine = FixedEngine(PrayerInstants {
            fajr: at(5),
            dhuhr: at(12),
            asr: at(11),
            maghrib: at(18),
            isha: at(20),
        });
        let err = build_schedule(
            &engine,
            cairo(),
            equinox(),
            CalculationMethod::MuslimWorldLeague,
            Madhab::Shafi,
        )
        .unwrap_err();
        assert_eq!(err.title(), "Calculation Error");
    }

    #[test]
    fn every_method_builds_in_mecca_and_london() {
        let places = [
            Coordinates::new(21.4225, 39.8262).unwrap(),
            Coordinates::new(51.5, -0.12).unwrap(),
        ];
        for coords in places {
            for method in CalculationMethod::ALL {
                for madhab in [Madhab::Shafi, Madhab::Hanafi] {
                    let result = build_schedule(&SalahEngine, coords, equinox(), method, madhab);
                    assert!(
                        result.is_ok(),
                        "{} {} at {}: {:?}",
                        method,
                        madhab,
                        coords.describe(),
                        result
                    );
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_mid_latitudes_always_build(
            lat in -48.0f64..=48.0,
            lon in -180.0f64..=180.0,
            day in 0u32..366,
        ) {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(day as i64);
            let coords = Coordinates::new(lat, lon).unwrap();
            let result = build_schedule(
                &SalahEngine,
                coords,
                date,
                CalculationMethod::MuslimWorldLeague,
                Madhab::Shafi,
            );
            prop_assert!(result.is_ok(), "lat={} lon={} date={}: {:?}", lat, lon, date, result);
        }

        #[test]
        fn prop_any_latitude_builds_or_reports_calculation_error(
            lat in -90.0f64..=90.0,
            lon in -180.0f64..=180.0,
            day in 0u32..366,
            method_idx in 0usize..CalculationMethod::ALL.len(),
            hanafi in any::<bool>(),
        ) {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                + chrono::Duration::days(day as i64);
            let madhab = if hanafi { Madhab::Hanafi } else { Madhab::Shafi };
            let result = build_schedule(
                &SalahEngine,
                Coordinates::new(lat, lon).unwrap(),
                date,
                CalculationMethod::ALL[method_idx],
                madhab,
            );
            prop_assert!(
                matches!(result, Ok(_) | Err(DashboardError::Calculation(_))),
                "lat={} lon={} date={}: {:?}", lat, lon, date, result
            );
        }
    }
}
