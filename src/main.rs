use std::io::{self, BufRead};

use anyhow::{bail, Context, Result};

use daylog::logging;
use daylog::{Logger, LoggerConfig};

const USAGE: &str = "Usage: daylog [DIR] [MAX_DAYS] < input";

fn main() -> Result<()> {
    logging::init_diagnostics();

    let config = config_from_args(std::env::args().skip(1).collect())?;
    let logger = Logger::configure(config)?;
    logger.dump_config();

    let stdin = io::stdin();
    let mut count = 0usize;
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read standard input")?;
        match line.strip_prefix("ERROR ") {
            Some(rest) => daylog::error!(logger, "{}", rest),
            None => daylog::info!(logger, "{}", line),
        }
        count += 1;
    }

    logger.close();
    tracing::info!("Wrote {} lines to {}", count, logger.current_file_path().display());
    Ok(())
}

/// Environment first, then positional `DIR` and `MAX_DAYS`
fn config_from_args(args: Vec<String>) -> Result<LoggerConfig> {
    if args.len() > 2 {
        bail!(USAGE);
    }

    let mut config = LoggerConfig::from_env();
    if let Some(dir) = args.first() {
        config = config.with_directory(dir);
    }
    if let Some(days) = args.get(1) {
        let days = days
            .parse::<i64>()
            .with_context(|| format!("Invalid MAX_DAYS '{}'. {}", days, USAGE))?;
        config = config.with_max_days(days);
    }
    Ok(config)
}
