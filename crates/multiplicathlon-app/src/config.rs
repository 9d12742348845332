//! Process configuration read from environment variables.

use std::path::PathBuf;

use crate::error::AppError;

/// Directory of the JSON store.
pub const DATA_DIR_VAR: &str = "MULTIPLICATHLON_DATA_DIR";

/// Optional seed for a reproducible RNG.
pub const SEED_VAR: &str = "MULTIPLICATHLON_SEED";

const DEFAULT_DATA_DIR: &str = ".multiplicathlon";

/// Settings of the application shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Where options and profiles are stored.
    pub data_dir: PathBuf,
    /// Fixed RNG seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which returns the value of
    /// a variable or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let seed = lookup(SEED_VAR)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| AppError::Config(format!("{SEED_VAR} must be a valid u64: {e}")))
            })
            .transpose()?;
        Ok(Self { data_dir, seed })
    }
}
