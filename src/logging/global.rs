//! Process-wide logger
//!
//! `configure` installs one [`Logger`] for the whole process; the
//! [`infof!`](crate::infof) and [`errorf!`](crate::errorf) macros write to it.
//! Code that wants an injectable logger should hold a [`Logger`] directly.

use std::fmt;
use std::sync::OnceLock;

use super::logger::Logger;
use super::record::CallSite;
use crate::config::LoggerConfig;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide logger from a level code, directory and retention window
///
/// The process cannot run without its log file: if the directory cannot be
/// created or today's file cannot be opened, the error is reported and the
/// process exits with status 1. A second call leaves the first logger in place.
pub fn configure(level: i64, directory: &str, max_days: i64) -> &'static Logger {
    configure_with(LoggerConfig::new(level, directory, max_days))
}

/// Like [`configure`], with a full [`LoggerConfig`]
pub fn configure_with(config: LoggerConfig) -> &'static Logger {
    if let Some(logger) = GLOBAL.get() {
        tracing::warn!("Logger already configured, keeping {}", logger.directory().display());
        return logger;
    }

    let logger = match Logger::configure(config) {
        Ok(logger) => logger,
        Err(e) => {
            tracing::error!("Cannot start logger: {}", e);
            eprintln!("daylog: {}", e);
            std::process::exit(1);
        }
    };

    // A logger installed concurrently wins; ours is dropped and closed
    GLOBAL.get_or_init(|| logger)
}

/// Install an already constructed logger as the process-wide one
///
/// Hands the logger back if one is installed already.
pub fn install(logger: Logger) -> Result<(), Logger> {
    GLOBAL.set(logger)
}

/// The process-wide logger, if configured
pub fn global() -> Option<&'static Logger> {
    GLOBAL.get()
}

#[doc(hidden)]
pub fn log_info(site: CallSite, message: fmt::Arguments<'_>) {
    match GLOBAL.get() {
        Some(logger) => logger.info(site, message),
        None => tracing::warn!("Logger not configured, dropping: {}", message),
    }
}

#[doc(hidden)]
pub fn log_error(site: CallSite, message: fmt::Arguments<'_>) {
    match GLOBAL.get() {
        Some(logger) => logger.error(site, message),
        None => tracing::warn!("Logger not configured, dropping: {}", message),
    }
}

/// Print the process-wide logger's configuration to standard output
pub fn dump_config() {
    if let Some(logger) = GLOBAL.get() {
        logger.dump_config();
    }
}

/// Drain and close the process-wide logger
///
/// Precondition: no thread logs through it any more.
pub fn close() {
    if let Some(logger) = GLOBAL.get() {
        logger.close();
    }
}
