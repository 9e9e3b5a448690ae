//! `dns-master` command-line entry point.
//!
//! # Responsibility
//! - Resolve paths, start logging and open the store once per invocation.
//! - Hand the parsed command to `commands::execute`.
//! - Close the store on exit and map failures to an exit code.

mod cli;
mod commands;
mod prompt;
mod render;

use clap::Parser;
use cli::Cli;
use dns_master_core::{
    close_db, default_log_level, init_logging, open_db, AppPaths, ConfigService,
    SqliteConfigRepository,
};
use rusqlite::Connection;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let stdin = io::stdin();
    let stdout = io::stdout();

    match run(cli, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, input: &mut impl BufRead, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let paths = AppPaths::resolve(cli.data_dir.as_deref(), cli.db.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = std::path::absolute(&paths.log_dir)?;
    if let Err(err) = init_logging(level, &log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let mut conn = open_db(&paths.database)?;
    let result = run_with_store(&mut conn, cli.command, input, out);
    close_db(conn);
    result
}

fn run_with_store(
    conn: &mut Connection,
    command: cli::Command,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let repo = SqliteConfigRepository::try_new(conn)?;
    let mut service = ConfigService::new(repo);
    commands::execute(command, &mut service, input, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::cli::Cli;
    use clap::Parser;
    use std::io::Cursor;

    fn invoke(data_dir: &std::path::Path, args: &[&str], answer: &str) -> (bool, String) {
        let mut argv = vec!["dns-master", "--data-dir", data_dir.to_str().unwrap()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut out = Vec::new();
        let ok = run(cli, &mut input, &mut out).is_ok();
        (ok, String::from_utf8(out).unwrap())
    }

    #[test]
    fn state_persists_across_invocations() {
        let dir = tempfile::tempdir().unwrap();

        assert!(invoke(dir.path(), &["add", "google", "8.8.8.8", "8.8.4.4"], "").0);
        assert!(!invoke(dir.path(), &["add", "google", "1.1.1.1"], "").0);
        assert!(invoke(dir.path(), &["modify", "-f", "google", "", "", "", "Google DNS"], "").0);

        let (ok, listing) = invoke(dir.path(), &["list"], "");
        assert!(ok);
        assert!(listing.contains("Google DNS"));
        assert!(listing.contains("8.8.4.4"));
        assert!(dir.path().join("dns_configs.db").exists());

        let (ok, output) = invoke(dir.path(), &["clear"], "yes\n");
        assert!(ok);
        assert!(output.contains("(1 removed)"));
    }

    #[test]
    fn explicit_log_level_is_accepted() {
        let dir = tempfile::tempdir().unwrap();

        let (ok, _) = invoke(dir.path(), &["--log-level", "debug", "add", "cf", "1.1.1.1"], "");
        assert!(ok);
        let (ok, listing) = invoke(dir.path(), &["list", "cf", "--log-level", "warn"], "");
        assert!(ok);
        assert!(listing.contains("1.1.1.1"));
    }
}
