//! # Tarot CLI Library
//!
//! Command-line access to the card deck: seeding the database, looking up and
//! listing cards, and the draw, daily and yes/no selections. The same engine
//! code backs the HTTP API, so answers match what the server returns.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = ["tarot", "--database", "sqlite://tarot.db", "daily", "--seed", "alice"];
//! let code = tarot_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `seed`: Load the bundled (or a given) dataset into the database
//! - `card`: Show one card by id
//! - `list`: Filter and paginate cards
//! - `draw`: Draw distinct random cards
//! - `daily`: Card of the day for a date and optional seed
//! - `yesno`: Yes/no/maybe answer from a random card
//! - `doctor`: Check the database is reachable and seeded

use clap::Parser;
use std::io::Write;

pub mod cli;
mod commands;
mod error;
pub mod exit_code;
pub mod ui;

use cli::{Commands, TarotCli};
use commands::{
    handle_card_command, handle_daily_command, handle_doctor_command, handle_draw_command,
    handle_list_command, handle_seed_command, handle_yesno_command,
};
pub use error::CliError;
use tarot_engine::daily::DailyParams;
use tarot_engine::query::ListParams;
use tarot_store::{SeedMode, SqliteCardStore};

const COMMANDS: &[&str] = &["seed", "card", "list", "draw", "daily", "yesno", "doctor"];

/// Parse `args`, run the subcommand and return the process exit code:
/// `0` on success, `2` on any error.
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match TarotCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let database = cli
        .database
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .filter(|url| !url.trim().is_empty());

    let result = match cli.cmd {
        Commands::Doctor => handle_doctor_command(database.as_deref(), out, err),
        cmd => open_store(database.as_deref())
            .and_then(|store| dispatch(cmd, &store, out, err)),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(CliError::Diagnostics(_)) => exit_code::ERROR,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn open_store(database: Option<&str>) -> Result<SqliteCardStore, CliError> {
    let url = database.ok_or_else(|| {
        CliError::Config("DATABASE_URL is required (or pass --database)".into())
    })?;
    Ok(SqliteCardStore::open(url)?)
}

fn dispatch(
    cmd: Commands,
    store: &SqliteCardStore,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    match cmd {
        Commands::Seed { data, drop } => {
            let mode = if drop {
                SeedMode::Reset
            } else {
                SeedMode::from_env()
            };
            handle_seed_command(store, data.as_deref(), mode, out, err)
        }
        Commands::Card { id } => handle_card_command(store, id, out),
        Commands::List {
            arcana,
            suit,
            q,
            limit,
            offset,
        } => handle_list_command(
            store,
            ListParams {
                arcana,
                suit,
                q,
                limit,
                offset,
            },
            out,
        ),
        Commands::Draw { count, seed } => handle_draw_command(store, count.as_deref(), seed, out),
        Commands::Daily { date, seed, legacy } => {
            handle_daily_command(store, DailyParams { date, seed }, legacy, out)
        }
        Commands::Yesno { seed } => handle_yesno_command(store, seed, out),
        Commands::Doctor => handle_doctor_command(store.path().to_str(), out, err),
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }

    let _ = writeln!(err, "{}", e);
    let _ = writeln!(err, "Usage: tarot [--database URL] <command> [options]\n");
    let _ = writeln!(err, "Commands:");
    for c in COMMANDS {
        let _ = writeln!(err, "  {}", c);
    }
    let _ = writeln!(err, "\nFor full help, run: tarot --help");
    exit_code::ERROR
}
