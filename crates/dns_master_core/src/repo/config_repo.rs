//! Configuration repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `dns_configs` table.
//! - Own transaction boundaries for every check-then-act sequence.
//! - Classify every failure into one of four caller-visible kinds.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Every mutating call runs in one `BEGIN IMMEDIATE` transaction, so the
//!   existence check and the write cannot interleave with another process.
//! - A transaction that is not committed is rolled back when dropped.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::config::{ConfigPatch, ConfigRecord, ConfigValidationError, FieldChange};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONFIGS_TABLE: &str = "dns_configs";
const CONFIG_COLUMNS: [&str; 4] = ["name", "primary_address", "secondary_address", "description"];

const CONFIG_SELECT_SQL: &str = "SELECT
    name,
    primary_address,
    secondary_address,
    description
FROM dns_configs";

pub type RepoResult<T> = Result<T, RepoError>;

/// Caller-facing failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    DuplicateName,
    NotFound,
    InvalidArgument,
    StorageFault,
}

impl StoreErrorKind {
    /// Stable snake_case code used in log lines.
    pub fn code(self) -> &'static str {
        match self {
            Self::DuplicateName => "duplicate_name",
            Self::NotFound => "not_found",
            Self::InvalidArgument => "invalid_argument",
            Self::StorageFault => "storage_fault",
        }
    }
}

/// Repository error for configuration persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ConfigValidationError),
    DuplicateName(String),
    NotFound(String),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Maps this error onto the four-kind taxonomy.
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::Validation(_) => StoreErrorKind::InvalidArgument,
            Self::DuplicateName(_) => StoreErrorKind::DuplicateName,
            Self::NotFound(_) => StoreErrorKind::NotFound,
            Self::Db(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => StoreErrorKind::StorageFault,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateName(name) => {
                write!(f, "a configuration with the name '{name}' already exists")
            }
            Self::NotFound(name) => {
                write!(f, "no configuration found with the identifier '{name}'")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted configuration: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigValidationError> for RepoError {
    fn from(value: ConfigValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for configuration CRUD operations.
pub trait ConfigRepository {
    /// Inserts a new record; fails with `DuplicateName` if the name is taken.
    fn create_config(&mut self, record: &ConfigRecord) -> RepoResult<()>;
    /// Applies a sparse patch to the record named `identifier` and returns
    /// the record as committed.
    fn update_config(
        &mut self,
        identifier: &str,
        patch: &ConfigPatch,
    ) -> RepoResult<ConfigRecord>;
    /// Deletes the record named `identifier`.
    fn delete_config(&mut self, identifier: &str) -> RepoResult<()>;
    /// Deletes every record and returns how many were removed.
    fn clear_configs(&mut self) -> RepoResult<u64>;
    /// Lists records in insertion order, optionally by name substring.
    fn list_configs(&self, filter: Option<&str>) -> RepoResult<Vec<ConfigRecord>>;
    /// Gets one record by exact name.
    fn get_config(&self, name: &str) -> RepoResult<Option<ConfigRecord>>;
    fn config_exists(&self, name: &str) -> RepoResult<bool>;
    fn count_configs(&self) -> RepoResult<u64>;
}

/// SQLite-backed configuration repository.
pub struct SqliteConfigRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteConfigRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema is
    ///   not the one this binary expects.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_config_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn begin_immediate(&mut self) -> RepoResult<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}

impl ConfigRepository for SqliteConfigRepository<'_> {
    fn create_config(&mut self, record: &ConfigRecord) -> RepoResult<()> {
        record.validate()?;
        let record = record.clone().normalized();

        let tx = self.begin_immediate()?;
        if config_exists_in(&tx, &record.name)? {
            return Err(RepoError::DuplicateName(record.name));
        }

        tx.execute(
            "INSERT INTO dns_configs (
                name,
                primary_address,
                secondary_address,
                description
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                record.name.as_str(),
                record.primary_address.as_str(),
                record.secondary_address.as_deref(),
                record.description.as_deref(),
            ],
        )
        .map_err(|err| classify_unique_violation(err, &record.name))?;

        tx.commit()?;
        Ok(())
    }

    fn update_config(
        &mut self,
        identifier: &str,
        patch: &ConfigPatch,
    ) -> RepoResult<ConfigRecord> {
        let patch = patch.clone().normalized();

        let tx = self.begin_immediate()?;
        let Some(current) = load_config_in(&tx, identifier)? else {
            return Err(RepoError::NotFound(identifier.to_string()));
        };

        if let Some(new_name) = patch.effective_rename(identifier) {
            if config_exists_in(&tx, new_name)? {
                return Err(RepoError::DuplicateName(new_name.to_string()));
            }
        }

        if patch.is_empty() {
            tx.commit()?;
            return Ok(current);
        }

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = patch.name.as_ref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(primary) = patch.primary_address.as_ref() {
            assignments.push("primary_address = ?");
            bind_values.push(Value::Text(primary.clone()));
        }
        push_field_change(
            &mut assignments,
            &mut bind_values,
            &patch.secondary_address,
            "secondary_address = ?",
            "secondary_address = NULL",
        );
        push_field_change(
            &mut assignments,
            &mut bind_values,
            &patch.description,
            "description = ?",
            "description = NULL",
        );

        let sql = format!(
            "UPDATE dns_configs SET {} WHERE name = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Text(identifier.to_string()));

        let rename_target = patch.name.as_deref().unwrap_or(identifier);
        let changed = tx
            .execute(&sql, params_from_iter(bind_values))
            .map_err(|err| classify_unique_violation(err, rename_target))?;

        if changed == 0 {
            return Err(RepoError::NotFound(identifier.to_string()));
        }

        let updated = load_config_in(&tx, rename_target)?.ok_or_else(|| {
            RepoError::InvalidData(format!("row `{rename_target}` vanished after update"))
        })?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete_config(&mut self, identifier: &str) -> RepoResult<()> {
        let tx = self.begin_immediate()?;
        if !config_exists_in(&tx, identifier)? {
            return Err(RepoError::NotFound(identifier.to_string()));
        }

        let changed = tx.execute("DELETE FROM dns_configs WHERE name = ?1;", [identifier])?;
        if changed == 0 {
            return Err(RepoError::NotFound(identifier.to_string()));
        }

        tx.commit()?;
        Ok(())
    }

    fn clear_configs(&mut self) -> RepoResult<u64> {
        let tx = self.begin_immediate()?;
        let removed = tx.execute("DELETE FROM dns_configs;", [])?;
        tx.commit()?;
        Ok(removed as u64)
    }

    fn list_configs(&self, filter: Option<&str>) -> RepoResult<Vec<ConfigRecord>> {
        let mut sql = String::from(CONFIG_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        // instr() is case-sensitive and has no wildcard characters, unlike LIKE.
        if let Some(filter) = filter.filter(|value| !value.is_empty()) {
            sql.push_str(" WHERE instr(name, ?) > 0");
            bind_values.push(Value::Text(filter.to_string()));
        }

        sql.push_str(" ORDER BY rowid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut configs = Vec::new();

        while let Some(row) = rows.next()? {
            configs.push(parse_config_row(row)?);
        }

        Ok(configs)
    }

    fn get_config(&self, name: &str) -> RepoResult<Option<ConfigRecord>> {
        load_config_in(self.conn, name)
    }

    fn config_exists(&self, name: &str) -> RepoResult<bool> {
        config_exists_in(self.conn, name)
    }

    fn count_configs(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM dns_configs;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn push_field_change(
    assignments: &mut Vec<&'static str>,
    bind_values: &mut Vec<Value>,
    change: &FieldChange,
    set_sql: &'static str,
    clear_sql: &'static str,
) {
    match change {
        FieldChange::Keep => {}
        FieldChange::Set(value) => {
            assignments.push(set_sql);
            bind_values.push(Value::Text(value.clone()));
        }
        FieldChange::Clear => assignments.push(clear_sql),
    }
}

/// Reports a `UNIQUE(name)` violation as `DuplicateName`; anything else is a
/// storage fault.
fn classify_unique_violation(err: rusqlite::Error, name: &str) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateName(name.to_string())
        }
        _ => err.into(),
    }
}

// `Transaction` derefs to `Connection`, so this serves both paths.
fn config_exists_in(conn: &Connection, name: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM dns_configs
            WHERE name = ?1
        );",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn load_config_in(conn: &Connection, name: &str) -> RepoResult<Option<ConfigRecord>> {
    let mut stmt = conn.prepare(&format!("{CONFIG_SELECT_SQL} WHERE name = ?1;"))?;
    let mut rows = stmt.query([name])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_config_row(row)?)),
        None => Ok(None),
    }
}

fn parse_config_row(row: &Row<'_>) -> RepoResult<ConfigRecord> {
    let record = ConfigRecord {
        name: row.get("name")?,
        primary_address: row.get("primary_address")?,
        secondary_address: row.get("secondary_address")?,
        description: row.get("description")?,
    };

    if let Err(err) = record.validate() {
        return Err(RepoError::InvalidData(format!(
            "row `{}` in dns_configs: {err}",
            record.name
        )));
    }

    // Older installs may hold '' where the value was never supplied.
    Ok(record.normalized())
}

fn ensure_config_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, CONFIGS_TABLE)? {
        return Err(RepoError::MissingRequiredTable(CONFIGS_TABLE));
    }

    for column in CONFIG_COLUMNS {
        if !table_has_column(conn, CONFIGS_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: CONFIGS_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
