//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve the database location and logging settings for callers.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; missing values fall back to defaults.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "PETS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PETS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PETS_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "pets.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetsConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
}

impl PetsConfig {
    /// Reads `PETS_DB_PATH`, `PETS_LOG_LEVEL` and `PETS_LOG_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: non_blank(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: non_blank(ENV_LOG_DIR).map(PathBuf::from),
        }
    }
}

impl Default for PetsConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::{PetsConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_when_unset() {
        let config = PetsConfig::default();
        assert_eq!(config.db_path, std::env::temp_dir().join("pets.sqlite3"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn values_are_trimmed_and_blank_counts_as_unset() {
        let env = HashMap::from([
            (ENV_DB_PATH, " /data/pets.db "),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "   "),
        ]);
        let config = PetsConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.db_path, PathBuf::from("/data/pets.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }
}
