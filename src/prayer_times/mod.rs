pub mod builder;
pub mod engine;

pub use builder::build_schedule;
pub use engine::{PrayerTimeEngine, SalahEngine};
