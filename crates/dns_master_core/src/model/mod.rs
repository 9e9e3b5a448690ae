//! Domain model for stored resolver configurations.
//!
//! # Responsibility
//! - Define the canonical record persisted by the store.
//! - Define the sparse patch shape accepted by updates.
//!
//! # Invariants
//! - Every record is identified by its unique, non-empty `name`.
//! - Absent optional fields are `None`, never an empty string.
//! - Deletion is immediate; there is no tombstone state.

pub mod config;
