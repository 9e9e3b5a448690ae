//! Resolver configuration model.
//!
//! # Responsibility
//! - Define `ConfigRecord`, the single entity kept by the store.
//! - Define `ConfigPatch` for partial updates and its normalization rules.
//! - Validate required fields before any write reaches SQLite.
//!
//! # Invariants
//! - `name` and `primary_address` are non-empty for every live record.
//! - Optional fields use `None` for "no value"; blank input normalizes to `None`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failure for record or patch input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// `name` is empty or whitespace only.
    EmptyName,
    /// `primary_address` is empty or whitespace only.
    EmptyPrimaryAddress,
}

impl Display for ConfigValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "configuration name must not be empty"),
            Self::EmptyPrimaryAddress => write!(f, "primary address must not be empty"),
        }
    }
}

impl Error for ConfigValidationError {}

/// One named resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Unique identifier, also the lookup key for update/delete.
    pub name: String,
    pub primary_address: String,
    pub secondary_address: Option<String>,
    pub description: Option<String>,
}

impl ConfigRecord {
    /// Creates a record with both optional fields unset.
    pub fn new(name: impl Into<String>, primary_address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_address: primary_address.into(),
            secondary_address: None,
            description: None,
        }
    }

    /// Sets the secondary address; blank values leave it unset.
    pub fn with_secondary_address(mut self, value: impl Into<String>) -> Self {
        self.secondary_address = non_blank(value.into());
        self
    }

    /// Sets the description; blank values leave it unset.
    pub fn with_description(mut self, value: impl Into<String>) -> Self {
        self.description = non_blank(value.into());
        self
    }

    /// Checks required fields.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is blank.
    /// - `EmptyPrimaryAddress` when `primary_address` is blank.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if is_blank(&self.name) {
            return Err(ConfigValidationError::EmptyName);
        }
        if is_blank(&self.primary_address) {
            return Err(ConfigValidationError::EmptyPrimaryAddress);
        }
        Ok(())
    }

    /// Returns a copy with blank optional fields folded to `None`.
    pub fn normalized(mut self) -> Self {
        self.secondary_address = self.secondary_address.and_then(non_blank);
        self.description = self.description.and_then(non_blank);
        self
    }
}

/// Requested change for one optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldChange {
    /// Leave the stored value as is.
    #[default]
    Keep,
    /// Replace the stored value.
    Set(String),
    /// Reset the field to "no value".
    Clear,
}

impl FieldChange {
    /// Maps `Some(value)` to `Set`, `None` to `Keep`.
    pub fn from_option(value: Option<String>) -> Self {
        value.map_or(Self::Keep, Self::Set)
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    fn normalized(self) -> Self {
        match self {
            Self::Set(value) if is_blank(&value) => Self::Keep,
            other => other,
        }
    }
}

/// Sparse update request. Omitted fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    /// New name; renames the record subject to uniqueness.
    pub name: Option<String>,
    pub primary_address: Option<String>,
    pub secondary_address: FieldChange,
    pub description: FieldChange,
}

impl ConfigPatch {
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn primary_address(mut self, value: impl Into<String>) -> Self {
        self.primary_address = Some(value.into());
        self
    }

    pub fn secondary_address(mut self, change: FieldChange) -> Self {
        self.secondary_address = change;
        self
    }

    pub fn description(mut self, change: FieldChange) -> Self {
        self.description = change;
        self
    }

    /// Drops blank values so that they count as "not supplied".
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.and_then(non_blank),
            primary_address: self.primary_address.and_then(non_blank),
            secondary_address: self.secondary_address.normalized(),
            description: self.description.normalized(),
        }
    }

    /// Returns whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.primary_address.is_none()
            && self.secondary_address.is_keep()
            && self.description.is_keep()
    }

    /// Returns the new name when it actually renames `identifier`.
    pub fn effective_rename<'a>(&'a self, identifier: &str) -> Option<&'a str> {
        self.name
            .as_deref()
            .filter(|name| !is_blank(name) && *name != identifier)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: String) -> Option<String> {
    if is_blank(&value) {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigPatch, ConfigRecord, ConfigValidationError, FieldChange};

    #[test]
    fn validate_rejects_blank_required_fields() {
        assert_eq!(
            ConfigRecord::new("  ", "1.1.1.1").validate(),
            Err(ConfigValidationError::EmptyName)
        );
        assert_eq!(
            ConfigRecord::new("cloudflare", "").validate(),
            Err(ConfigValidationError::EmptyPrimaryAddress)
        );
        assert!(ConfigRecord::new("cloudflare", "1.1.1.1").validate().is_ok());
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let record = ConfigRecord {
            secondary_address: Some(String::new()),
            description: Some("  ".to_string()),
            ..ConfigRecord::new("google", "8.8.8.8")
        }
        .normalized();
        assert_eq!(record.secondary_address, None);
        assert_eq!(record.description, None);

        let built = ConfigRecord::new("google", "8.8.8.8").with_secondary_address("");
        assert_eq!(built.secondary_address, None);
    }

    #[test]
    fn patch_normalization_treats_empty_values_as_not_supplied() {
        let patch = ConfigPatch::default()
            .rename("")
            .primary_address(" ")
            .secondary_address(FieldChange::Set(String::new()))
            .description(FieldChange::Clear)
            .normalized();

        assert_eq!(patch.name, None);
        assert_eq!(patch.primary_address, None);
        assert_eq!(patch.secondary_address, FieldChange::Keep);
        assert_eq!(patch.description, FieldChange::Clear);
        assert!(!patch.is_empty());
        assert!(ConfigPatch::default().is_empty());
    }

    #[test]
    fn effective_rename_ignores_same_name() {
        let patch = ConfigPatch::default().rename("test1");
        assert_eq!(patch.effective_rename("test1"), None);
        assert_eq!(patch.effective_rename("test2"), Some("test1"));
    }

    #[test]
    fn record_serializes_absent_fields_as_null() {
        let json = serde_json::to_value(ConfigRecord::new("quad9", "9.9.9.9")).unwrap();
        assert_eq!(json["secondary_address"], serde_json::Value::Null);
        assert_eq!(json["description"], serde_json::Value::Null);
        assert_eq!(json["name"], "quad9");
    }
}
