//! Runtime path configuration.
//!
//! Explicit values (command-line flags) win over environment variables,
//! which win over built-in defaults.

use std::path::{Path, PathBuf};

/// Environment variable naming the catalog file.
pub const DATA_FILE_ENV: &str = "SHELFKEEP_DATA_FILE";
/// Environment variable naming the log directory.
pub const LOG_DIR_ENV: &str = "SHELFKEEP_LOG_DIR";
/// Catalog file used when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "library.json";
const DEFAULT_LOG_SUBDIR: &str = "logs";

/// Resolves the catalog file path.
pub fn resolve_data_file(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| non_empty_env(DATA_FILE_ENV))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}

/// Resolves the log directory as an absolute path.
///
/// Defaults to `logs/` next to the catalog file.
pub fn resolve_log_dir(explicit: Option<&Path>, data_file: &Path) -> PathBuf {
    let dir = explicit
        .map(Path::to_path_buf)
        .or_else(|| non_empty_env(LOG_DIR_ENV))
        .unwrap_or_else(|| {
            data_file
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(DEFAULT_LOG_SUBDIR)
        });
    absolutize(&dir)
}

fn non_empty_env(name: &str) -> Option<PathBuf> {
    let raw = std::env::var(name).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
