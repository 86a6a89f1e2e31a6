mod auth;
mod cli;
mod config;
mod dashboard;
mod db;
mod error;
mod models;
mod platform;
mod prayer_times;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use rusqlite::Connection;
use std::fs::OpenOptions;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;
use db::repository::SessionRepo;
use platform::ConfiguredLocation;

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let (lat, lon) = cli.coordinate_flags()?;
    let mut config = AppConfig::load().context("Loading config")?;
    if let Some(method) = cli.method {
        config.calculation.method = method;
    }
    if let Some(madhab) = cli.madhab {
        config.calculation.madhab = madhab;
    }

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    let provider = ConfiguredLocation::new(&config.location, lat, lon);

    match cli.command {
        Some(Commands::Login { register }) => {
            handlers::handle_login(&conn, &config, register)?;
        }
        Some(Commands::Logout) => {
            handlers::handle_logout(&conn)?;
        }
        Some(Commands::Times { json, prayer }) => {
            handlers::handle_times(&config, &provider, json, prayer)?;
        }
        Some(Commands::Config { init }) => {
            handlers::handle_config(&config, init)?;
        }

        // No subcommand → dashboard, behind the login screen
        None => {
            if SessionRepo::current(&conn)?.is_none() {
                log::info!("no saved session, showing login");
                if cli::login_tui::run_login_tui(&conn, &config, false)?.is_none() {
                    return Ok(());
                }
            }
            tui::app::run(&conn, &config, Box::new(provider))?;
        }
    }

    Ok(())
}

/// Log to a file under the data directory so output never lands on the
/// alternate screen; fall back to stderr when the file can't be opened.
fn init_logging() {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));

    let file = AppConfig::ensure_data_dir()
        .and_then(|_| AppConfig::log_path())
        .ok()
        .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok());

    if let Some(file) = file {
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();
}
