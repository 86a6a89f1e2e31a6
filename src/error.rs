use thiserror::Error;

/// Recoverable failures surfaced to the user as toasts.
///
/// Each variant is caught where it originates; none of them ends the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("location unavailable: {0}")]
    Location(String),
    #[error("timezone unresolved: {0}")]
    Timezone(String),
    #[error("prayer calculation failed: {0}")]
    Calculation(String),
}

impl DashboardError {
    pub fn title(&self) -> &'static str {
        match self {
            DashboardError::Location(_) => "Location Error",
            DashboardError::Timezone(_) => "Timezone Error",
            DashboardError::Calculation(_) => "Calculation Error",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DashboardError::Location(_) => {
                "Unable to get your location. Please enable location services."
            }
            DashboardError::Timezone(_) => "Unable to determine your timezone.",
            DashboardError::Calculation(_) => "Unable to calculate prayer times.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("'{0}' is not a valid phone number")]
    InvalidPhone(String),
    #[error("Password is required")]
    MissingPassword,
}
