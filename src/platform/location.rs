use crate::config::settings::LocationConfig;
use crate::error::DashboardError;
use crate::models::Coordinates;

/// One-shot source of the device position.
pub trait LocationProvider: Send {
    fn locate(&self) -> Result<Coordinates, DashboardError>;
}

/// Coordinates from command-line flags, falling back to `[location]` in
/// the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl ConfiguredLocation {
    pub fn new(config: &LocationConfig, lat_flag: Option<f64>, lon_flag: Option<f64>) -> Self {
        // Flags only win as a pair so a stray --lat never mixes with a
        // configured longitude.
        let (latitude, longitude) = match (lat_flag, lon_flag) {
            (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
            _ => (config.latitude, config.longitude),
        };
        Self {
            latitude,
            longitude,
        }
    }
}

impl LocationProvider for ConfiguredLocation {
    fn locate(&self) -> Result<Coordinates, DashboardError> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon)
                .map_err(|e| DashboardError::Location(e.to_string())),
            _ => Err(DashboardError::Location(
                "no coordinates configured; set [location] latitude/longitude or pass --lat/--lon"
                    .to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(lat: Option<f64>, lon: Option<f64>) -> LocationConfig {
        LocationConfig {
            name: None,
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn reads_configured_coordinates() {
        let provider = ConfiguredLocation::new(&config(Some(21.4225), Some(39.8262)), None, None);
        let coords = provider.locate().unwrap();
        assert_eq!(coords.latitude(), 21.4225);
        assert_eq!(coords.longitude(), 39.8262);
    }

    #[test]
    fn flags_override_config_as_a_pair() {
        let cfg = config(Some(21.4225), Some(39.8262));
        let both = ConfiguredLocation::new(&cfg, Some(51.5), Some(-0.12)).locate().unwrap();
        assert_eq!(both.latitude(), 51.5);

        let half = ConfiguredLocation::new(&cfg, Some(51.5), None).locate().unwrap();
        assert_eq!(half.latitude(), 21.4225);
    }

    #[test]
    fn missing_coordinates_is_a_location_error() {
        let err = ConfiguredLocation::new(&config(Some(10.0), None), None, None)
            .locate()
            .unwrap_err();
        assert_eq!(err.title(), "Location Error");
    }

    #[test]
    fn invalid_coordinates_is_a_location_error() {
        let err = ConfiguredLocation::new(&config(Some(120.0), Some(0.0)), None, None)
            .locate()
            .unwrap_err();
        assert!(matches!(err, DashboardError::Location(_)));
    }
}
