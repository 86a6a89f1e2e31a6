use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::models::{CalculationMethod, Madhab, PrayerName};

#[derive(Parser, Debug)]
#[command(name = "miqat", version, author, about = "Daily prayer times dashboard for the terminal")]
pub struct Cli {
    /// Latitude override (use together with --lon)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude override (use together with --lat)
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Calculation method override, e.g. UmmAlQura or MWL
    #[arg(long, global = true)]
    pub method: Option<CalculationMethod>,

    /// Madhab override (Shafi or Hanafi)
    #[arg(long, global = true)]
    pub madhab: Option<Madhab>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Both coordinate flags, or neither.
    pub fn coordinate_flags(&self) -> Result<(Option<f64>, Option<f64>)> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => bail!("--lat and --lon must be given together"),
            pair => Ok(pair),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in with a phone number and password
    Login {
        /// Open the form on the Register tab
        #[arg(long)]
        register: bool,
    },
    /// Clear the saved session
    Logout,
    /// Print today's prayer times
    Times {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Only show this prayer (fajr, dhuhr/zuhr, asr, maghrib, isha)
        #[arg(long)]
        prayer: Option<PrayerName>,
    },
    /// Show the config file path and effective values
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}
