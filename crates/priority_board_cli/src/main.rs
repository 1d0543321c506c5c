//! Command-line front end for the priority board.
//!
//! # Responsibility
//! - Open a SQLite-backed board and run one gesture per invocation.
//! - Render the resulting board or rejection as plain text.
//!
//! Items are addressed by id or by label (case-insensitive).

use clap::{Parser, Subcommand, ValueEnum};
use priority_board_core::db::open_db;
use priority_board_core::{
    core_version, default_log_level, init_logging, normalize_label, BoardError, BoardSession,
    BoardState, BoardStore, ItemId, ListKind, MoveDirection, SaveStatus, SqliteStorage,
    SummaryOptions,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "priority-board", version, about = "Rank what matters, one move at a time")]
struct Cli {
    /// SQLite file holding the board.
    #[arg(long, default_value = "priority_board.sqlite3")]
    db: PathBuf,

    /// Directory for rolling log files. Logging stays off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show both lists.
    List,
    /// Add an item to the top of the unprioritized pool.
    Add {
        label: String,
        #[arg(long)]
        emoji: Option<String>,
    },
    /// Rename an item.
    Rename { item: String, label: String },
    /// Move an item to a list, optionally at a 1-based rank.
    Move {
        item: String,
        #[arg(value_enum)]
        list: ListArg,
        #[arg(long)]
        rank: Option<i64>,
    },
    /// Move a ranked item one rank up.
    Up { item: String },
    /// Move a ranked item one rank down.
    Down { item: String },
    /// Append an unprioritized item to the ranking.
    Promote { item: String },
    /// Send a ranked item back to the pool.
    Demote { item: String },
    /// Shuffle everything and rank half of it.
    Randomize,
    /// Restore the starter board and clear saved data.
    Reset,
    /// Lock in the ranking and print the share text.
    Lock {
        #[arg(long)]
        owner: Option<String>,
        #[arg(long, default_value = "today")]
        date: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ListArg {
    Unprioritized,
    Prioritized,
}

impl From<ListArg> for ListKind {
    fn from(value: ListArg) -> Self {
        match value {
            ListArg::Unprioritized => ListKind::Unprioritized,
            ListArg::Prioritized => ListKind::Prioritized,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &absolute(log_dir).to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }
    log::info!("event=cli_start module=cli version={}", core_version());

    let conn = match open_db(&cli.db) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("cannot open board database `{}`: {err}", cli.db.display());
            return ExitCode::FAILURE;
        }
    };
    let storage = match SqliteStorage::try_new(&conn) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("board database is not usable: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut session = BoardSession::open(BoardStore::new(storage));

    match run(&mut session, cli.command.unwrap_or(Command::List)) {
        Ok(status) => {
            print_board(session.state());
            if status == SaveStatus::NotSaved {
                eprintln!("warning: changes were not saved");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    session: &mut BoardSession<SqliteStorage<'_>>,
    command: Command,
) -> Result<SaveStatus, BoardError> {
    match command {
        Command::List => Ok(SaveStatus::Saved),
        Command::Add { label, emoji } => match emoji {
            Some(emoji) => session.add_item_with_emoji(&label, &emoji),
            None => session.add_item(&label),
        },
        Command::Rename { item, label } => {
            let id = resolve(session.state(), &item)?;
            session.rename_item(&id, &label)
        }
        Command::Move { item, list, rank } => {
            let id = resolve(session.state(), &item)?;
            session.move_item(&id, list.into(), rank.map(|rank| rank - 1))
        }
        Command::Up { item } => {
            let id = resolve(session.state(), &item)?;
            session.move_rank(&id, MoveDirection::Up)
        }
        Command::Down { item } => {
            let id = resolve(session.state(), &item)?;
            session.move_rank(&id, MoveDirection::Down)
        }
        Command::Promote { item } => {
            let id = resolve(session.state(), &item)?;
            session.promote(&id)
        }
        Command::Demote { item } => {
            let id = resolve(session.state(), &item)?;
            session.demote(&id)
        }
        Command::Randomize => session.randomize(),
        Command::Reset => Ok(session.reset()),
        Command::Lock { owner, date } => {
            session.lock_in()?;
            let options = SummaryOptions {
                owner: owner.map(|owner| format!("{owner}'s ")),
                date_label: date,
            };
            if let Some(summary) = session.summary(&options) {
                println!("{summary}\n");
            }
            Ok(SaveStatus::Saved)
        }
    }
}

/// Finds an item by exact id first, then by normalized label.
fn resolve(state: &BoardState, key: &str) -> Result<ItemId, BoardError> {
    let id = ItemId::new(key.trim());
    if state.get(&id).is_some() {
        return Ok(id);
    }
    let normalized = normalize_label(key);
    state
        .items()
        .find(|item| item.normalized_label() == normalized)
        .map(|item| item.id.clone())
        .ok_or(BoardError::ItemNotFound(id))
}

fn print_board(state: &BoardState) {
    println!("Priorities:");
    if state.prioritized.is_empty() {
        println!("  (none yet)");
    }
    for (index, item) in state.prioritized.iter().enumerate() {
        println!("  {:>2}. {} {}  [{}]", index + 1, item.emoji, item.label, item.id);
    }
    println!("Unprioritized:");
    for item in state.unprioritized.iter() {
        println!("   -  {} {}  [{}]", item.emoji, item.label, item.id);
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
