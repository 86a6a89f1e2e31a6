//! Injected capabilities standing in for platform services: where the
//! device is and which time zone the user lives in.

pub mod location;
pub mod timezone;

pub use location::{ConfiguredLocation, LocationProvider};
pub use timezone::{DisplayZone, SystemTimezone, TimezoneResolver};
