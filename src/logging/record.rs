//! Call-site capture and line formatting
//!
//! Every line is rendered on the calling thread, so the caller's file, line and
//! function are known before the line is handed to the writer thread.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Local};

use crate::config::LogLevel;

/// Timestamp layout used inside a line (second precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source location of a logging call
///
/// Built by the logging macros from `file!()`, `line!()` and the enclosing
/// function's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub function: &'static str,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// The function name without its module path
    pub fn short_function(&self) -> &'static str {
        short_function_name(self.function)
    }
}

/// Reduce a fully qualified function path to its last segment
///
/// Closure frames (`{{closure}}`) are folded into the function that contains them.
pub fn short_function_name(full_name: &str) -> &str {
    let mut name = full_name;
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    match name.rfind("::") {
        Some(pos) => &name[pos + 2..],
        None => name,
    }
}

/// Render one newline-terminated log line
///
/// Format: `[<LEVEL>][<timestamp>] fileLine:<file>:<line> funcName:<fn>;message:<message>`
pub fn format_line(
    level: LogLevel,
    timestamp: &DateTime<Local>,
    site: &CallSite,
    message: fmt::Arguments<'_>,
) -> String {
    let mut line = String::with_capacity(128);
    // Writing into a String cannot fail
    let _ = writeln!(
        line,
        "[{}][{}] fileLine:{}:{} funcName:{};message:{}",
        level,
        timestamp.format(TIMESTAMP_FORMAT),
        site.file,
        site.line,
        site.short_function(),
        message
    );
    line
}
