//! Core state model for the priority board.
//! This crate is the single source of truth for board invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{BoardState, InvariantViolation, ListKind, MoveDirection, CURRENT_VERSION};
pub use model::item::{normalize_label, Item, ItemId, DEFAULT_EMOJI};
pub use repo::board_store::{BoardStore, STORAGE_KEY};
pub use repo::migrate::{migrate_item, migrate_record, MigratedBoard, RecordRejection};
pub use service::board_ops::{
    add_item, add_item_with_emoji, demote, is_duplicate_label, move_item, move_rank, promote,
    randomize, randomize_with_thread_rng, rename_item, reset, BoardError, BoardResult,
};
pub use service::session::{BoardSession, SaveStatus};
pub use service::summary::{format_summary, SummaryOptions, SUMMARY_MAX_ITEMS};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
