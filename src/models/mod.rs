pub mod location;
pub mod prayer;
pub mod schedule;

pub use location::Coordinates;
pub use prayer::{CalculationMethod, Madhab, PrayerEvent, PrayerName};
pub use schedule::Schedule;
