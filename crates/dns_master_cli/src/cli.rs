//! Command-line argument model.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage named DNS resolver configurations stored in a local database.
#[derive(Debug, Parser)]
#[command(name = "dns-master", version, arg_required_else_help = true)]
pub struct Cli {
    /// Directory holding the database and logs.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Database file to use instead of `<data dir>/dns_configs.db`.
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Add a new DNS configuration.
    Add {
        /// Unique name used to reference the configuration later.
        identifier: String,
        /// Primary DNS address.
        primary_address: String,
        /// Secondary DNS address.
        secondary_address: Option<String>,
        /// Free-form description.
        description: Option<String>,
        /// List configurations after the operation.
        #[arg(short = 'l', long = "list")]
        list_after: bool,
    },

    /// Remove a DNS configuration by its identifier.
    Remove {
        identifier: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        force: bool,
        /// List configurations after the operation.
        #[arg(short = 'l', long = "list")]
        list_after: bool,
    },

    /// Modify an existing DNS configuration.
    ///
    /// Pass an empty string to skip a positional value.
    Modify {
        identifier: String,
        /// New identifier; the record is renamed.
        new_identifier: Option<String>,
        new_primary_address: Option<String>,
        new_secondary_address: Option<String>,
        new_description: Option<String>,
        /// Remove the stored secondary address.
        #[arg(long, conflicts_with = "new_secondary_address")]
        clear_secondary: bool,
        /// Remove the stored description.
        #[arg(long, conflicts_with = "new_description")]
        clear_description: bool,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        force: bool,
        /// List configurations after the operation.
        #[arg(short = 'l', long = "list")]
        list_after: bool,
    },

    /// List saved DNS configurations, optionally filtered by name.
    List {
        /// Substring matched against configuration names (case-sensitive).
        filter: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Clear all saved DNS configurations.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        force: bool,
        /// List configurations after the operation.
        #[arg(short = 'l', long = "list")]
        list_after: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_accepts_optional_positionals_and_list_flag() {
        let cli = Cli::try_parse_from([
            "dns-master",
            "add",
            "--list",
            "google",
            "8.8.8.8",
            "8.8.4.4",
            "Google's DNS",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Command::Add {
                identifier: "google".to_string(),
                primary_address: "8.8.8.8".to_string(),
                secondary_address: Some("8.8.4.4".to_string()),
                description: Some("Google's DNS".to_string()),
                list_after: true,
            }
        );
    }

    #[test]
    fn add_requires_primary_address() {
        assert!(Cli::try_parse_from(["dns-master", "add", "only_name"]).is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dns-master",
            "remove",
            "-f",
            "old",
            "--db",
            "/tmp/x.db",
            "--log-level",
            "warn",
        ])
        .unwrap();
        assert_eq!(cli.db.as_deref(), Some(std::path::Path::new("/tmp/x.db")));
        assert_eq!(cli.log_level.as_deref(), Some("warn"));
        assert!(matches!(cli.command, Command::Remove { force: true, .. }));
    }

    #[test]
    fn modify_rejects_clear_together_with_new_value() {
        let result = Cli::try_parse_from([
            "dns-master",
            "modify",
            "cf",
            "",
            "",
            "1.0.0.1",
            "--clear-secondary",
        ]);
        assert!(result.is_err());
    }
}
