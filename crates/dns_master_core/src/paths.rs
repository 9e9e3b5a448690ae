//! Application data, database and log path resolution.
//!
//! # Responsibility
//! - Locate the per-user data directory holding the configuration database.
//! - Derive the database file and log directory from it.
//!
//! # Invariants
//! - Resolution order: explicit override, `DNS_MASTER_DATA_DIR`,
//!   `$XDG_DATA_HOME/dns-master`, `$HOME/.local/share/dns-master`.
//! - Resolution never panics; a missing home is reported as an error.

use std::env;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "dns-master";
pub const DATABASE_FILE_NAME: &str = "dns_configs.db";
pub const DATA_DIR_ENV: &str = "DNS_MASTER_DATA_DIR";
const LOG_DIR_NAME: &str = "logs";

/// Resolved on-disk locations for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub log_dir: PathBuf,
}

impl AppPaths {
    /// Resolves paths from the process environment.
    ///
    /// `data_dir` and `database` are explicit overrides, typically from CLI
    /// flags. Directories are not created here.
    ///
    /// # Errors
    /// Returns `NotFound` when no override is given and neither
    /// `XDG_DATA_HOME` nor `HOME` is set.
    pub fn resolve(data_dir: Option<&Path>, database: Option<&Path>) -> Result<Self, Error> {
        Self::resolve_with(data_dir, database, |key| env::var(key).ok())
    }

    /// Same as [`AppPaths::resolve`] with an injectable variable lookup.
    pub fn resolve_with(
        data_dir: Option<&Path>,
        database: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Error> {
        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_data_dir(&lookup)?,
        };
        let database = database
            .map(Path::to_path_buf)
            .unwrap_or_else(|| data_dir.join(DATABASE_FILE_NAME));
        let log_dir = data_dir.join(LOG_DIR_NAME);

        Ok(Self {
            data_dir,
            database,
            log_dir,
        })
    }
}

fn default_data_dir(lookup: &impl Fn(&str) -> Option<String>) -> Result<PathBuf, Error> {
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(dir) = non_empty(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    if let Some(xdg) = non_empty("XDG_DATA_HOME") {
        return Ok(PathBuf::from(xdg).join(APP_NAME));
    }
    if let Some(home) = non_empty("HOME") {
        return Ok(PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_NAME));
    }

    Err(Error::new(
        ErrorKind::NotFound,
        "cannot locate a data directory: neither XDG_DATA_HOME nor HOME is set",
    ))
}
