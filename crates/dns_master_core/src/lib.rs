//! Configuration store for dns-master.
//! This crate is the single source of truth for record invariants: unique
//! names, sparse updates and atomic writes.

pub mod db;
pub mod logging;
pub mod model;
pub mod paths;
pub mod repo;
pub mod service;

pub use db::{close_db, open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::config::{ConfigPatch, ConfigRecord, ConfigValidationError, FieldChange};
pub use paths::AppPaths;
pub use repo::config_repo::{
    ConfigRepository, RepoError, RepoResult, SqliteConfigRepository, StoreErrorKind,
};
pub use service::config_service::ConfigService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
