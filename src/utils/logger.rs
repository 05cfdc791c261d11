/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
******************************************************************************/

//! Idempotent `tracing` subscriber setup, driven by the `LOGLEVEL`
//! environment variable.

use std::sync::Once;
use tracing_subscriber::FmtSubscriber;
use {std::env, tracing::Level};

static INIT: Once = Once::new();

fn level_from_str(log_level: &str) -> Level {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => Level::DEBUG,
        "ERROR" => Level::ERROR,
        "WARN" => Level::WARN,
        "TRACE" => Level::TRACE,
        _ => Level::INFO,
    }
}

/// Sets up the global `tracing` subscriber at the level named by the
/// `LOGLEVEL` environment variable (default `INFO`). Safe to call from
/// multiple call sites; only the first call takes effect.
///
/// # Panics
/// Panics if a global subscriber is already set by something other than
/// this function.
pub fn setup_logger() {
    INIT.call_once(|| {
        let log_level = env::var("LOGLEVEL").unwrap_or_else(|_| "INFO".to_string());
        let level = level_from_str(&log_level);
        let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
        tracing::subscriber::set_global_default(subscriber).expect("Error setting default subscriber");
        tracing::debug!("Log level set to: {}", level);
    });
}

/// Sets up the global `tracing` subscriber at an explicit level, ignoring
/// `LOGLEVEL`. Also idempotent; a prior `setup_logger()` call wins.
pub fn setup_logger_with_level(log_level: &str) {
    INIT.call_once(|| {
        let level = level_from_str(log_level);
        let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
        tracing::subscriber::set_global_default(subscriber).expect("Error setting default subscriber");
        tracing::debug!("Log level set to: {}", level);
    });
}
