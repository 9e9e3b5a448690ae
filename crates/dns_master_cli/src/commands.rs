//! Command dispatch from parsed arguments to store operations.
//!
//! # Responsibility
//! - Ask for confirmation before remove/modify/clear unless forced.
//! - Call exactly one store operation per command (plus the optional list).
//! - Turn store errors into user-facing failures.

use crate::cli::Command;
use crate::prompt::confirm;
use crate::render::{render_json, render_table};
use dns_master_core::{
    ConfigPatch, ConfigRepository, ConfigService, FieldChange, RepoError, StoreErrorKind,
};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

/// Failure of one CLI command.
#[derive(Debug)]
pub enum CommandError {
    Store {
        operation: &'static str,
        source: RepoError,
    },
    Io(io::Error),
    Json(serde_json::Error),
}

impl CommandError {
    /// Taxonomy kind of the underlying store failure, if any.
    pub fn store_kind(&self) -> Option<StoreErrorKind> {
        match self {
            Self::Store { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store { operation, source } => {
                let hint = if self.store_kind() == Some(StoreErrorKind::StorageFault) {
                    " (storage error)"
                } else {
                    ""
                };
                write!(f, "Failed to {operation}: {source}{hint}")
            }
            Self::Io(err) => write!(f, "terminal I/O failed: {err}"),
            Self::Json(err) => write!(f, "failed to encode JSON output: {err}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store { source, .. } => Some(source),
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<io::Error> for CommandError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

fn store_error(operation: &'static str) -> impl FnOnce(RepoError) -> CommandError {
    move |source| CommandError::Store { operation, source }
}

/// Runs one parsed command against the store.
pub fn execute<R: ConfigRepository>(
    command: Command,
    service: &mut ConfigService<R>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    info!("event=cli_command module=cli status=start command={}", command_name(&command));

    match command {
        Command::Add {
            identifier,
            primary_address,
            secondary_address,
            description,
            list_after,
        } => {
            let created = service
                .create_config(identifier, primary_address, secondary_address, description)
                .map_err(store_error("add the configuration"))?;
            if list_after {
                print_list(service, None, false, out)?;
            }
            writeln!(
                out,
                "Configuration '{}' has been successfully added.",
                created.name
            )?;
        }

        Command::Remove {
            identifier,
            force,
            list_after,
        } => {
            if !confirmed(
                force,
                "Are you sure you want to delete this configuration?",
                input,
                out,
            )? {
                writeln!(out, "Operation cancelled. No configurations were deleted.")?;
                return Ok(());
            }
            service
                .delete_config(&identifier)
                .map_err(store_error("remove the configuration"))?;
            if list_after {
                print_list(service, None, false, out)?;
            }
            writeln!(
                out,
                "Configuration '{identifier}' has been successfully removed."
            )?;
        }

        Command::Modify {
            identifier,
            new_identifier,
            new_primary_address,
            new_secondary_address,
            new_description,
            clear_secondary,
            clear_description,
            force,
            list_after,
        } => {
            if !confirmed(
                force,
                "Are you sure you want to modify the configuration?",
                input,
                out,
            )? {
                writeln!(out, "Operation cancelled. No configurations were modified.")?;
                return Ok(());
            }
            let patch = ConfigPatch {
                name: new_identifier,
                primary_address: new_primary_address,
                secondary_address: optional_change(new_secondary_address, clear_secondary),
                description: optional_change(new_description, clear_description),
            };
            let updated = service
                .update_config(&identifier, &patch)
                .map_err(store_error("modify the configuration"))?;
            if list_after {
                print_list(service, None, false, out)?;
            }
            if updated.name == identifier {
                writeln!(
                    out,
                    "Configuration '{identifier}' has been successfully modified."
                )?;
            } else {
                writeln!(
                    out,
                    "Configuration '{identifier}' has been successfully modified (now '{}').",
                    updated.name
                )?;
            }
        }

        Command::List { filter, json } => {
            print_list(service, filter.as_deref(), json, out)?;
        }

        Command::Clear { force, list_after } => {
            if !confirmed(
                force,
                "Are you sure you want to delete ALL configurations?",
                input,
                out,
            )? {
                writeln!(out, "Operation cancelled. No configurations were deleted.")?;
                return Ok(());
            }
            let removed = service
                .clear_configs()
                .map_err(store_error("clear the configurations"))?;
            if list_after {
                print_list(service, None, false, out)?;
            }
            writeln!(
                out,
                "All DNS configurations have been successfully deleted ({removed} removed)."
            )?;
        }
    }

    Ok(())
}

fn confirmed(
    force: bool,
    question: &str,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> io::Result<bool> {
    if force {
        return Ok(true);
    }
    confirm(question, input, out)
}

fn optional_change(value: Option<String>, clear: bool) -> FieldChange {
    if clear {
        FieldChange::Clear
    } else {
        FieldChange::from_option(value)
    }
}

fn print_list<R: ConfigRepository>(
    service: &ConfigService<R>,
    filter: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let records = service
        .list_configs(filter)
        .map_err(store_error("retrieve the configurations"))?;
    if json {
        writeln!(out, "{}", render_json(&records)?)?;
    } else {
        write!(out, "{}", render_table(&records, filter))?;
    }
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Add { .. } => "add",
        Command::Remove { .. } => "remove",
        Command::Modify { .. } => "modify",
        Command::List { .. } => "list",
        Command::Clear { .. } => "clear",
    }
}
