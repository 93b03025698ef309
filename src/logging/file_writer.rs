//! Date-stamped log file with midnight rotation
//!
//! One `YYYY-MM-DD.log` file is open at a time. The writer thread rotates it
//! when the date it was opened for no longer matches today.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::LOG_FILE_SUFFIX;
use crate::error::{LoggerError, Result};

/// Date layout used in file names and for the rotation check
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// File name for a given day
pub fn log_file_name(date: NaiveDate) -> String {
    format!("{}{}", date.format(FILE_DATE_FORMAT), LOG_FILE_SUFFIX)
}

/// Full path of the log file for a given day
pub fn log_file_path(logs_dir: &Path, date: NaiveDate) -> PathBuf {
    logs_dir.join(log_file_name(date))
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggerError::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

/// The currently open daily file
#[derive(Debug)]
pub struct DailyFile {
    logs_dir: PathBuf,
    file: Option<File>,
    /// Date the open file belongs to, as `YYYY-MM-DD`
    date: String,
    path: PathBuf,
}

impl DailyFile {
    /// Open (creating if needed) the file for `date` in append mode
    pub fn open(logs_dir: PathBuf, date: NaiveDate) -> Result<Self> {
        let path = log_file_path(&logs_dir, date);
        let file = open_append(&path)?;

        Ok(Self {
            logs_dir,
            file: Some(file),
            date: date.format(FILE_DATE_FORMAT).to_string(),
            path,
        })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Whether `today` differs from the date the open file was created for
    pub fn needs_rotation(&self, today: NaiveDate) -> bool {
        today.format(FILE_DATE_FORMAT).to_string() != self.date
    }

    /// Close the current file and open the one for `today`
    ///
    /// On failure no file is open and the recorded date is left unchanged, so
    /// the next write tries again.
    pub fn rotate(&mut self, today: NaiveDate) -> Result<()> {
        // Dropping the handle closes it; close errors are not reported
        self.file.take();

        let path = log_file_path(&self.logs_dir, today);
        let file = open_append(&path)?;

        self.file = Some(file);
        self.date = today.format(FILE_DATE_FORMAT).to_string();
        self.path = path;
        Ok(())
    }

    /// Append one already newline-terminated line with a single write
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.write_all(line.as_bytes()),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "no log file is open",
            )),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    /// Close the file handle, ignoring errors
    pub fn close(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
    }
}
