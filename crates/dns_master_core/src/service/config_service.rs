//! Configuration use-case service.
//!
//! # Responsibility
//! - Provide the store entry points used by the CLI: create, update,
//!   delete-one, delete-all, query, exists.
//! - Normalize raw user input before it reaches the repository.
//! - Emit metadata-only `event=config_*` log lines.
//!
//! # Invariants
//! - Service APIs never bypass repository validation or transactions.
//! - Log lines never carry names, addresses or descriptions.

use crate::model::config::{ConfigPatch, ConfigRecord};
use crate::repo::config_repo::{ConfigRepository, RepoResult};
use log::{debug, info, warn};
use std::time::Instant;

/// Use-case service wrapper for configuration CRUD operations.
pub struct ConfigService<R: ConfigRepository> {
    repo: R,
}

impl<R: ConfigRepository> ConfigService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one configuration and returns the stored record.
    ///
    /// Blank optional values are stored as "no value".
    pub fn create_config(
        &mut self,
        name: impl Into<String>,
        primary_address: impl Into<String>,
        secondary_address: Option<String>,
        description: Option<String>,
    ) -> RepoResult<ConfigRecord> {
        let record = ConfigRecord {
            name: name.into(),
            primary_address: primary_address.into(),
            secondary_address,
            description,
        }
        .normalized();

        let started_at = Instant::now();
        let result = self.repo.create_config(&record);
        log_outcome("config_create", started_at, &result);
        result?;
        Ok(record)
    }

    /// Applies a sparse patch and returns the record as committed.
    pub fn update_config(
        &mut self,
        identifier: &str,
        patch: &ConfigPatch,
    ) -> RepoResult<ConfigRecord> {
        let patch = patch.clone().normalized();
        let started_at = Instant::now();
        let result = self.repo.update_config(identifier, &patch);
        log_outcome("config_update", started_at, &result);
        result
    }

    /// Deletes one configuration by name.
    pub fn delete_config(&mut self, identifier: &str) -> RepoResult<()> {
        let started_at = Instant::now();
        let result = self.repo.delete_config(identifier);
        log_outcome("config_delete", started_at, &result);
        result
    }

    /// Deletes every configuration. Succeeds on an empty store.
    pub fn clear_configs(&mut self) -> RepoResult<u64> {
        let started_at = Instant::now();
        let result = self.repo.clear_configs();
        match result.as_ref() {
            Ok(removed) => info!(
                "event=config_clear module=service status=ok duration_ms={} removed={}",
                started_at.elapsed().as_millis(),
                removed
            ),
            Err(_) => log_outcome("config_clear", started_at, &result),
        }
        result
    }

    /// Lists configurations in insertion order.
    ///
    /// `filter` keeps records whose name contains it (case-sensitive). A
    /// missing or empty filter returns everything.
    pub fn list_configs(&self, filter: Option<&str>) -> RepoResult<Vec<ConfigRecord>> {
        let filter = filter.filter(|value| !value.is_empty());
        let result = self.repo.list_configs(filter);
        match result.as_ref() {
            Ok(items) => debug!(
                "event=config_list module=service status=ok filtered={} count={}",
                filter.is_some(),
                items.len()
            ),
            Err(err) => warn!(
                "event=config_list module=service status=error error_code={}",
                err.kind().code()
            ),
        }
        result
    }

    /// Gets one configuration by exact name.
    pub fn get_config(&self, name: &str) -> RepoResult<Option<ConfigRecord>> {
        self.repo.get_config(name)
    }

    /// Returns whether a configuration named `name` exists.
    ///
    /// A failed read is an error, never `false`.
    pub fn config_exists(&self, name: &str) -> RepoResult<bool> {
        self.repo.config_exists(name)
    }

    /// Returns the number of stored configurations.
    pub fn count_configs(&self) -> RepoResult<u64> {
        self.repo.count_configs()
    }
}

fn log_outcome<T>(event: &str, started_at: Instant, result: &RepoResult<T>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!("event={event} module=service status=ok duration_ms={duration_ms}"),
        Err(err) => warn!(
            "event={event} module=service status=error duration_ms={duration_ms} error_code={}",
            err.kind().code()
        ),
    }
}
