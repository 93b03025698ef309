//! Asynchronous daily file logger
//!
//! Callers format their line and push it onto a bounded queue; a single writer
//! thread drains the queue into today's file, rotating at midnight and kicking
//! off retention sweeps in the background.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::SystemTime;

use crossbeam_channel::{Receiver, Sender};

use super::clock::{Clock, SystemClock};
use super::file_writer::DailyFile;
use super::record::{format_line, CallSite};
use super::retention;
use crate::config::{resolve_directory, LogLevel, LoggerConfig, SweepPolicy};
use crate::error::{LoggerError, Result};

/// Work items for the writer thread
enum Command {
    Line(String),
    Flush(Sender<()>),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// State shared between callers, the writer thread and retention sweeps
struct Shared {
    level: AtomicU8,
    directory: PathBuf,
    max_days: i64,
    sweep_policy: SweepPolicy,
    sticky_error_level: bool,
    clock: Arc<dyn Clock>,
    file: Mutex<DailyFile>,
    /// Set while a background sweep is running
    sweeping: AtomicBool,
}

impl Shared {
    fn level(&self) -> LogLevel {
        LogLevel::from_code(i64::from(self.level.load(Ordering::Acquire))).unwrap_or_default()
    }

    fn set_level(&self, level: LogLevel) {
        self.level.store(level.code(), Ordering::Release);
    }

    /// Rotate if the day changed, then append the line. Returns whether a
    /// rotation happened.
    fn write_line(&self, line: &str) -> bool {
        let today = self.clock.today();
        let mut file = lock(&self.file);

        let mut rotated = false;
        if !file.is_open() || file.needs_rotation(today) {
            if let Err(e) = file.rotate(today) {
                tracing::error!("Failed to rotate log file: {}", e);
                return false;
            }
            rotated = true;
        }

        if let Err(e) = file.write_line(line) {
            tracing::error!("Failed to write to {}: {}", file.path().display(), e);
        }
        rotated
    }

    fn flush(&self) {
        if let Err(e) = lock(&self.file).flush() {
            tracing::error!("Failed to flush log file: {}", e);
        }
    }

    fn clear_old_logs(&self) -> Result<usize> {
        let current = lock(&self.file).path().to_path_buf();
        retention::clear_old_logs(
            &files_dir(&self.directory),
            self.max_days,
            Some(&current),
            SystemTime::from(self.clock.now()),
        )
    }
}

/// Directory the daily files live in and the sweep walks
///
/// An unresolved (empty) directory becomes `.`, so the open file's path and
/// the paths seen by the sweep are spelled the same way.
fn files_dir(directory: &Path) -> PathBuf {
    if directory.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        directory.to_path_buf()
    }
}

/// Start a background retention sweep unless one is already running
fn trigger_sweep(shared: &Arc<Shared>) {
    if shared
        .sweeping
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return;
    }

    let sweep = Arc::clone(shared);
    let spawned = thread::Builder::new()
        .name("daylog-retention".into())
        .spawn(move || {
            match sweep.clear_old_logs() {
                Ok(count) if count > 0 => tracing::info!("Cleaned up {} old log files", count),
                Ok(_) => {}
                Err(e) => tracing::error!("Failed to clean old logs: {}", e),
            }
            sweep.sweeping.store(false, Ordering::Release);
        });

    if let Err(e) = spawned {
        shared.sweeping.store(false, Ordering::Release);
        tracing::error!("Failed to start retention sweep: {}", e);
    }
}

fn run_writer(shared: Arc<Shared>, receiver: Receiver<Command>) {
    // Ends once every sender is dropped and the queue is empty
    for command in receiver {
        match command {
            Command::Line(line) => {
                let rotated = shared.write_line(&line);
                match shared.sweep_policy {
                    SweepPolicy::EveryWrite => trigger_sweep(&shared),
                    SweepPolicy::OnRotation if rotated => trigger_sweep(&shared),
                    SweepPolicy::OnRotation => {}
                }
            }
            Command::Flush(ack) => {
                shared.flush();
                let _ = ack.send(());
            }
        }
    }
    tracing::debug!("Log writer drained, exiting");
}

/// Handle to a running daily file logger
///
/// Lines are written by a background thread. Use the [`info!`](crate::info)
/// and [`error!`](crate::error) macros so the caller's location is captured.
///
/// `close` must not race with further logging calls: stop producers first.
pub struct Logger {
    shared: Arc<Shared>,
    sender: Mutex<Option<Sender<Command>>>,
    writer: Mutex<Option<JoinHandle<()>>>,
}

impl Logger {
    /// Start a logger using the system clock
    ///
    /// Creates the directory if needed, opens today's file, starts the writer
    /// thread and runs one retention sweep in the background.
    pub fn configure(config: LoggerConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Start a logger that takes dates and timestamps from `clock`
    pub fn with_clock(config: LoggerConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        if !config.directory.as_os_str().is_empty() {
            std::fs::create_dir_all(&config.directory).map_err(|source| {
                LoggerError::CreateDirectory {
                    path: config.directory.clone(),
                    source,
                }
            })?;
        }
        let directory = resolve_directory(config.effective_directory());

        let file = DailyFile::open(files_dir(&directory), clock.today())?;
        tracing::info!("Logging to: {}", file.path().display());

        let shared = Arc::new(Shared {
            level: AtomicU8::new(config.level.code()),
            directory,
            max_days: config.max_days,
            sweep_policy: config.sweep_policy,
            sticky_error_level: config.sticky_error_level,
            clock,
            file: Mutex::new(file),
            sweeping: AtomicBool::new(false),
        });

        let (sender, receiver) = crossbeam_channel::bounded(config.queue_capacity.max(1));
        let writer_shared = Arc::clone(&shared);
        let writer = thread::Builder::new()
            .name("daylog-writer".into())
            .spawn(move || run_writer(writer_shared, receiver))
            .map_err(LoggerError::SpawnWriter)?;

        trigger_sweep(&shared);

        Ok(Self {
            shared,
            sender: Mutex::new(Some(sender)),
            writer: Mutex::new(Some(writer)),
        })
    }

    /// Queue an informational line
    pub fn info(&self, site: CallSite, message: fmt::Arguments<'_>) {
        self.log(site, message);
    }

    /// Queue an error line
    ///
    /// With `sticky_error_level` (the default) this also switches the shared
    /// level to `Error`, so every later line is tagged `[Error]`.
    pub fn error(&self, site: CallSite, message: fmt::Arguments<'_>) {
        if self.shared.sticky_error_level {
            self.shared.set_level(LogLevel::Error);
        }
        self.log(site, message);
    }

    fn log(&self, site: CallSite, message: fmt::Arguments<'_>) {
        let line = format_line(
            self.shared.level(),
            &self.shared.clock.now(),
            &site,
            message,
        );
        if let Err(e) = self.enqueue(Command::Line(line)) {
            tracing::warn!("Dropping log line: {}", e);
        }
    }

    /// Push onto the queue, blocking while it is full
    fn enqueue(&self, command: Command) -> Result<()> {
        // Clone so no lock is held while blocked on a full queue
        let sender = lock(&self.sender).clone().ok_or(LoggerError::Closed)?;
        sender.send(command).map_err(|_| LoggerError::Closed)
    }

    /// Block until every line queued before this call is written and flushed
    pub fn flush(&self) -> Result<()> {
        let (ack_tx, ack_rx) = crossbeam_channel::bounded(1);
        self.enqueue(Command::Flush(ack_tx))?;
        ack_rx.recv().map_err(|_| LoggerError::Closed)
    }

    /// Run a retention sweep on the calling thread
    ///
    /// Returns the number of files removed. The open file is never removed.
    pub fn clear_old_logs(&self) -> Result<usize> {
        self.shared.clear_old_logs()
    }

    pub fn level(&self) -> LogLevel {
        self.shared.level()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.shared.set_level(level);
    }

    /// Resolved absolute log directory
    pub fn directory(&self) -> &Path {
        &self.shared.directory
    }

    pub fn max_days(&self) -> i64 {
        self.shared.max_days
    }

    /// Path of the file the writer is appending to
    pub fn current_file_path(&self) -> PathBuf {
        lock(&self.shared.file).path().to_path_buf()
    }

    /// Level name, directory and retention days, space separated
    pub fn config_summary(&self) -> String {
        format!(
            "{} {} {}",
            self.level(),
            self.shared.directory.display(),
            self.shared.max_days
        )
    }

    /// Print the current configuration to standard output
    pub fn dump_config(&self) {
        println!("{}", self.config_summary());
    }

    /// Stop accepting lines, drain the queue and close the file
    ///
    /// Calling this more than once is harmless.
    pub fn close(&self) {
        lock(&self.sender).take();

        if let Some(writer) = lock(&self.writer).take() {
            if writer.join().is_err() {
                tracing::error!("Log writer thread panicked");
            }
        }

        lock(&self.shared.file).close();
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.sender).is_none()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("directory", &self.shared.directory)
            .field("max_days", &self.shared.max_days)
            .field("closed", &self.is_closed())
            .finish()
    }
}
