//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "signals";
const APPLICATION: &str = "signals";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 25;

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/signals` or `~/.cache/signals`
/// - macOS: `~/Library/Caches/io.signals.signals`
/// - Windows: `C:\Users\<User>\AppData\Local\signals\signals\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the data directory, where `brands.json` is looked up by default.
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Default brand list location.
pub fn brands_file() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("brands.json"))
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}

/// Rotate logs: rename latest.log to timestamped name, clean up old logs.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    if let Some(cache) = cache_dir() {
        rotate_logs_in(&cache);
    }
}

/// Archive `latest.log` in `cache_dir` and prune archives beyond MAX_OLD_LOGS.
fn rotate_logs_in(cache_dir: &Path) {
    let latest = cache_dir.join("latest.log");

    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let archived = cache_dir.join(format!("{}.log", timestamp));
        let _ = fs::rename(&latest, &archived);
    }

    cleanup_old_logs(cache_dir);
}

/// Remove old log files, keeping only the most recent MAX_OLD_LOGS.
fn cleanup_old_logs(cache_dir: &Path) {
    let Ok(entries) = fs::read_dir(cache_dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();

    // Oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    if logs.len() > MAX_OLD_LOGS {
        for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("signals-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn log_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".log"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_rotate_archives_latest() {
        let dir = scratch_dir("rotate");
        fs::write(dir.join("latest.log"), "previous run").unwrap();
        fs::write(dir.join("notes.txt"), "kept").unwrap();

        rotate_logs_in(&dir);

        let names = log_names(&dir);
        assert_eq!(names.len(), 1);
        assert_ne!(names[0], "latest.log");
        assert_eq!(fs::read_to_string(dir.join(&names[0])).unwrap(), "previous run");
        assert!(dir.join("notes.txt").exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_cleanup_keeps_most_recent_archives() {
        let dir = scratch_dir("cleanup");
        for i in 0..MAX_OLD_LOGS + 5 {
            fs::write(dir.join(format!("2024010{}_{:06}.log", i % 10, i)), "old").unwrap();
        }
        fs::write(dir.join("latest.log"), "current").unwrap();

        cleanup_old_logs(&dir);

        let names = log_names(&dir);
        assert_eq!(names.len(), MAX_OLD_LOGS + 1);
        assert!(names.iter().any(|n| n == "latest.log"));
        fs::remove_dir_all(&dir).unwrap();
    }
}
