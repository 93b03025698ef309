//! Retention sweep over the log directory
//!
//! Walks the directory tree and removes `.log` files whose modification time
//! is older than the retention window. Other files are never touched, and the
//! caller can name one file (the one being written) that is always kept.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::config::LOG_FILE_SUFFIX;
use crate::error::{LoggerError, Result};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Modification-time cutoff for a retention window
///
/// Returns `None` when every file is eligible (a negative window too far in
/// the future to represent).
fn cutoff(now: SystemTime, max_days: i64) -> Option<SystemTime> {
    let span = max_days
        .unsigned_abs()
        .checked_mul(SECS_PER_DAY)
        .map(Duration::from_secs);

    if max_days >= 0 {
        Some(
            span.and_then(|d| now.checked_sub(d))
                .unwrap_or(SystemTime::UNIX_EPOCH),
        )
    } else {
        span.and_then(|d| now.checked_add(d))
    }
}

fn is_log_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(LOG_FILE_SUFFIX))
        .unwrap_or(false)
}

/// List a directory, or `None` if it no longer exists
fn read_dir_if_present(dir: &Path) -> Result<Option<fs::ReadDir>> {
    match fs::read_dir(dir) {
        Ok(entries) => Ok(Some(entries)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(LoggerError::Walk {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Remove log files in `logs_dir` (recursively) not modified within `max_days`
/// of `now`
///
/// Only files ending in `.log` are removed; `exclude` is never removed. Files
/// and directories that vanish mid-walk count as already gone, so overlapping
/// sweeps do not fail each other. Any other error stops the sweep.
///
/// Returns the number of files deleted.
pub fn clear_old_logs(
    logs_dir: &Path,
    max_days: i64,
    exclude: Option<&Path>,
    now: SystemTime,
) -> Result<usize> {
    let cutoff = cutoff(now, max_days);
    let mut deleted_count = 0;
    let mut pending: Vec<PathBuf> = vec![logs_dir.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let Some(entries) = read_dir_if_present(&dir)? else {
            continue;
        };
        let walk_err = |source: io::Error| LoggerError::Walk {
            path: dir.clone(),
            source,
        };

        for entry in entries {
            let entry = entry.map_err(walk_err)?;
            let path = entry.path();

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(LoggerError::Walk { path, source }),
            };

            if metadata.is_dir() {
                pending.push(path);
                continue;
            }

            if !is_log_file(&path) || exclude == Some(path.as_path()) {
                continue;
            }

            let modified = metadata
                .modified()
                .map_err(|source| LoggerError::Walk {
                    path: path.clone(),
                    source,
                })?;

            let expired = match cutoff {
                Some(cutoff) => modified < cutoff,
                None => true,
            };
            if !expired {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!("Removed log file: {}", path.display());
                    deleted_count += 1;
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(LoggerError::Remove { path, source }),
            }
        }
    }

    Ok(deleted_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(path: &Path) {
        File::create(path).unwrap().write_all(b"test").unwrap();
    }

    fn backdate(path: &Path, days: u64) {
        let when = SystemTime::now() - Duration::from_secs(days * SECS_PER_DAY);
        filetime::set_file_mtime(path, FileTime::from_system_time(when)).unwrap();
    }

    fn sweep(dir: &Path, max_days: i64, exclude: Option<&Path>) -> usize {
        clear_old_logs(dir, max_days, exclude, SystemTime::now()).unwrap()
    }

    #[test]
    fn test_sweep_of_fresh_directory_removes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let today = temp_dir.path().join("2026-01-21.log");
        write_file(&today);

        assert_eq!(sweep(temp_dir.path(), 7, None), 0);
        assert!(today.exists());
    }

    #[test]
    fn test_sweep_of_missing_directory_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let gone = temp_dir.path().join("rotated").join("gone");

        assert_eq!(sweep(&gone, 7, None), 0);
        assert!(read_dir_if_present(&gone).unwrap().is_none());
    }

    #[test]
    fn test_sweep_uses_supplied_time() {
        let temp_dir = TempDir::new().unwrap();
        let written_now = temp_dir.path().join("2026-01-21.log");
        write_file(&written_now);

        let in_ten_days = SystemTime::now() + Duration::from_secs(10 * SECS_PER_DAY);
        assert_eq!(clear_old_logs(temp_dir.path(), 7, None, SystemTime::now()).unwrap(), 0);
        assert_eq!(clear_old_logs(temp_dir.path(), 7, None, in_ten_days).unwrap(), 1);
        assert!(!written_now.exists());
    }

    #[test]
    fn test_cleanup_removes_only_old_log_files() {
        let temp_dir = TempDir::new().unwrap();

        let old_log = temp_dir.path().join("2026-01-01.log");
        let recent_log = temp_dir.path().join("2026-01-20.log");
        let old_other = temp_dir.path().join("notes.txt");
        write_file(&old_log);
        write_file(&recent_log);
        write_file(&old_other);
        backdate(&old_log, 10);
        backdate(&recent_log, 2);
        backdate(&old_other, 30);

        let count = sweep(temp_dir.path(), 7, None);
        assert_eq!(count, 1);

        assert!(!old_log.exists());
        assert!(recent_log.exists());
        assert!(old_other.exists());
    }

    #[test]
    fn test_cleanup_recurses_into_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("archive").join("2025");
        fs::create_dir_all(&nested).unwrap();

        let old_nested = nested.join("2025-12-01.log");
        write_file(&old_nested);
        backdate(&old_nested, 60);

        let count = sweep(temp_dir.path(), 7, None);
        assert_eq!(count, 1);
        assert!(!old_nested.exists());
        assert!(nested.exists());
    }

    #[test]
    fn test_cleanup_twice_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let old_log = temp_dir.path().join("2026-01-01.log");
        write_file(&old_log);
        backdate(&old_log, 10);

        assert_eq!(sweep(temp_dir.path(), 7, None), 1);
        assert_eq!(sweep(temp_dir.path(), 7, None), 0);
    }

    #[test]
    fn test_zero_days_removes_everything_but_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let open_log = temp_dir.path().join("2026-01-21.log");
        let other_log = temp_dir.path().join("2026-01-20.log");
        write_file(&open_log);
        write_file(&other_log);
        backdate(&open_log, 1);
        backdate(&other_log, 1);

        let count = sweep(temp_dir.path(), 0, Some(&open_log));
        assert_eq!(count, 1);
        assert!(open_log.exists());
        assert!(!other_log.exists());
    }

    #[test]
    fn test_negative_days_moves_cutoff_into_future() {
        let temp_dir = TempDir::new().unwrap();
        let fresh_log = temp_dir.path().join("2026-01-21.log");
        write_file(&fresh_log);

        let count = sweep(temp_dir.path(), -1, None);
        assert_eq!(count, 1);
        assert!(!fresh_log.exists());
    }

    #[test]
    fn test_cutoff_extremes() {
        let now = SystemTime::now();
        assert_eq!(cutoff(now, i64::MAX), Some(SystemTime::UNIX_EPOCH));
        assert_eq!(cutoff(now, i64::MIN), None);
        assert_eq!(
            cutoff(now, 1),
            Some(now - Duration::from_secs(SECS_PER_DAY))
        );
    }
}
