//! Daily file logging
//!
//! Provides the asynchronous writer, midnight rotation, retention sweeps and
//! the process-wide logger.

mod clock;
mod diagnostics;
mod file_writer;
mod global;
mod logger;
mod record;
pub mod retention;

pub use clock::{Clock, ManualClock, SystemClock};
pub use diagnostics::{init_diagnostics, DEFAULT_DIAGNOSTIC_FILTER};
pub use file_writer::{log_file_name, log_file_path, DailyFile, FILE_DATE_FORMAT};
pub use global::{close, configure, configure_with, dump_config, global, install};
#[doc(hidden)]
pub use global::{log_error, log_info};
pub use logger::Logger;
pub use record::{format_line, short_function_name, CallSite, TIMESTAMP_FORMAT};
