//! Log file setup.

use std::fs::{self, File};

use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use crate::error::AppError;
use crate::paths;

/// Rotate old logs and install a file logger at `<cache>/latest.log`.
pub fn init(level: LevelFilter) -> Result<(), AppError> {
    let cache = paths::cache_dir().ok_or(AppError::NoCacheDir)?;
    fs::create_dir_all(&cache)?;
    paths::rotate_logs();

    let path = paths::log_file().ok_or(AppError::NoCacheDir)?;
    let log_file = File::create(&path)?;
    WriteLogger::init(level, Config::default(), log_file)?;
    log::info!("logging to {}", path.display());
    Ok(())
}
