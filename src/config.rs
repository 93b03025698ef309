//! Configuration for the daily file logger

use std::fmt;
use std::path::{Path, PathBuf};

/// Default retention window in days
pub const DEFAULT_MAX_DAYS: i64 = 7;

/// Default number of formatted lines the writer queue holds before producers block
pub const DEFAULT_QUEUE_CAPACITY: usize = 3000;

/// Suffix shared by every file the logger writes and the retention sweep removes
pub const LOG_FILE_SUFFIX: &str = ".log";

const ENV_LEVEL: &str = "DAYLOG_LEVEL";
const ENV_DIR: &str = "DAYLOG_DIR";
const ENV_MAX_DAYS: &str = "DAYLOG_MAX_DAYS";

/// Log level tag written in front of every line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 1,
    #[default]
    Info = 2,
    Error = 3,
}

impl LogLevel {
    /// Map a numeric level code to a level
    ///
    /// Only 1 (Debug), 2 (Info) and 3 (Error) are recognized.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(LogLevel::Debug),
            2 => Some(LogLevel::Info),
            3 => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Numeric code of this level
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "Debug",
            LogLevel::Info => "Info",
            LogLevel::Error => "Error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When the writer fires a background retention sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepPolicy {
    /// After every line written
    EveryWrite,
    /// Only after the writer rotates to a new day's file
    #[default]
    OnRotation,
}

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Level in effect when the logger starts
    pub level: LogLevel,

    /// Directory holding the daily files (empty means the current directory)
    pub directory: PathBuf,

    /// Files not modified within this many days are removed. Stored verbatim:
    /// zero or negative values make every log file except the open one eligible.
    pub max_days: i64,

    /// Capacity of the writer queue
    pub queue_capacity: usize,

    /// Background retention trigger
    pub sweep_policy: SweepPolicy,

    /// Whether logging an error switches the shared level to `Error`
    pub sticky_error_level: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            directory: PathBuf::new(),
            max_days: DEFAULT_MAX_DAYS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            sweep_policy: SweepPolicy::default(),
            sticky_error_level: true,
        }
    }
}

impl LoggerConfig {
    /// Build a config from a numeric level, a directory and a retention window
    ///
    /// A level of `0` keeps the default (`Info`); unrecognized codes are ignored.
    pub fn new(level: i64, directory: impl Into<PathBuf>, max_days: i64) -> Self {
        Self::default()
            .with_level_code(level)
            .with_directory(directory)
            .with_max_days(max_days)
    }

    /// Build a config from `DAYLOG_LEVEL`, `DAYLOG_DIR` and `DAYLOG_MAX_DAYS`
    ///
    /// Unset or unparsable variables leave the defaults in place.
    pub fn from_env() -> Self {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(code) = lookup(ENV_LEVEL).and_then(|v| v.trim().parse::<i64>().ok()) {
            self = self.with_level_code(code);
        }
        if let Some(dir) = lookup(ENV_DIR) {
            self.directory = PathBuf::from(dir);
        }
        if let Some(days) = lookup(ENV_MAX_DAYS).and_then(|v| v.trim().parse::<i64>().ok()) {
            self.max_days = days;
        }
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the level from its numeric code, silently ignoring unknown codes
    pub fn with_level_code(mut self, code: i64) -> Self {
        if let Some(level) = LogLevel::from_code(code) {
            self.level = level;
        }
        self
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_max_days(mut self, max_days: i64) -> Self {
        self.max_days = max_days;
        self
    }

    /// Set the queue capacity (a capacity of zero is raised to one)
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_sweep_policy(mut self, policy: SweepPolicy) -> Self {
        self.sweep_policy = policy;
        self
    }

    pub fn with_sticky_error_level(mut self, sticky: bool) -> Self {
        self.sticky_error_level = sticky;
        self
    }

    /// Directory to create and resolve, with the empty path meaning "."
    pub fn effective_directory(&self) -> &Path {
        if self.directory.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.directory
        }
    }
}

/// Resolve a directory to an absolute path
///
/// Failure is reported on standard output and yields an empty path; the logger
/// carries on with files relative to the process working directory.
pub fn resolve_directory(dir: &Path) -> PathBuf {
    let resolved = if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        std::env::current_dir().map(|cwd| cwd.join(dir))
    };

    match resolved {
        Ok(path) => {
            let path = normalize(&path);
            println!("{}", path.display());
            path
        }
        Err(e) => {
            println!("Failed to get absolute path: {}", e);
            PathBuf::new()
        }
    }
}

/// Drop `.` components and fold `..` lexically
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
