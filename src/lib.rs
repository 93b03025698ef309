//! daylog - asynchronous daily file logger
//!
//! Lines are formatted at the call site with the caller's file, line and
//! function, queued, and written by a background thread to `YYYY-MM-DD.log`.
//! The file rotates at midnight and old log files are swept away in the
//! background.

pub mod config;
pub mod error;
pub mod logging;
mod macros;

pub use config::{LogLevel, LoggerConfig, SweepPolicy};
pub use error::LoggerError;
pub use logging::{CallSite, Logger};
