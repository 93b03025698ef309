use std::path::Path;
use std::sync::Arc;
use std::thread;

use chrono::Local;
use tempfile::TempDir;

use daylog::logging::log_file_name;
use daylog::{LogLevel, Logger, LoggerConfig, SweepPolicy};

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Startup
// ============================================================================

#[test]
fn test_configure_creates_todays_file() {
    let temp_dir = TempDir::new().unwrap();
    let logger = Logger::configure(LoggerConfig::new(0, temp_dir.path(), 7)).unwrap();

    let today = log_file_name(Local::now().date_naive());
    assert!(temp_dir.path().join(&today).exists());
    assert_eq!(logger.level(), LogLevel::Info);
    assert_eq!(logger.max_days(), 7);
}

#[test]
fn test_invalid_level_code_falls_back() {
    let temp_dir = TempDir::new().unwrap();
    let logger = Logger::configure(LoggerConfig::new(17, temp_dir.path(), 7)).unwrap();
    assert_eq!(logger.level(), LogLevel::Info);
}

// ============================================================================
// Write path
// ============================================================================

#[test]
fn test_macros_capture_caller() {
    let temp_dir = TempDir::new().unwrap();
    let logger = Logger::configure(LoggerConfig::new(2, temp_dir.path(), 7)).unwrap();

    daylog::info!(logger, "request {} served", 12);
    logger.close();

    let lines = read_lines(&logger.current_file_path());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[Info]["));
    assert!(lines[0].contains(" fileLine:tests/logger.rs:"));
    assert!(lines[0].contains(" funcName:test_macros_capture_caller;"));
    assert!(lines[0].ends_with(";message:request 12 served"));
}

#[test]
fn test_shared_logger_across_threads() {
    let temp_dir = TempDir::new().unwrap();
    let config = LoggerConfig::new(2, temp_dir.path(), 7).with_sweep_policy(SweepPolicy::EveryWrite);
    let logger = Arc::new(Logger::configure(config).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..100 {
                    if i % 10 == 0 {
                        daylog::error!(logger, "worker {} failed step {}", t, i);
                    } else {
                        daylog::info!(logger, "worker {} step {}", t, i);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.close();

    let lines = read_lines(&logger.current_file_path());
    assert_eq!(lines.len(), 400);
    assert!(lines
        .iter()
        .all(|l| l.contains(" fileLine:") && l.contains(" funcName:") && l.contains(";message:worker ")));
    assert_eq!(logger.level(), LogLevel::Error);
}

// ============================================================================
// Retention
// ============================================================================

#[test]
fn test_sweep_leaves_non_log_files() {
    let temp_dir = TempDir::new().unwrap();
    let notes = temp_dir.path().join("notes.txt");
    std::fs::write(&notes, "keep me").unwrap();
    let past = std::time::SystemTime::now() - std::time::Duration::from_secs(30 * 24 * 3600);
    filetime::set_file_mtime(&notes, filetime::FileTime::from_system_time(past)).unwrap();

    let logger = Logger::configure(LoggerConfig::new(2, temp_dir.path(), 1)).unwrap();
    assert_eq!(logger.clear_old_logs().unwrap(), 0);
    assert!(notes.exists());
}
