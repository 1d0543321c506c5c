//! Stateful board session for presentation layers.
//!
//! # Responsibility
//! - Own the working snapshot, the lock-in flag and the board store.
//! - Persist after every accepted mutation and report whether it stuck.
//!
//! # Invariants
//! - The in-memory snapshot is authoritative; a failed save never rolls it
//!   back.
//! - While locked, every mutation except `reset` is rejected unchanged.
//! - The lock flag lives only in memory and is never persisted.

use crate::model::board::{BoardState, ListKind, MoveDirection};
use crate::model::item::ItemId;
use crate::repo::board_store::BoardStore;
use crate::service::board_ops::{self, BoardError, BoardResult};
use crate::service::summary::{format_summary, SummaryOptions};
use crate::storage::KeyValueStorage;
use log::{debug, info, warn};
use rand::Rng;

/// Whether the snapshot produced by an operation reached storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    /// Storage refused the write; the session keeps working in memory.
    NotSaved,
}

impl From<bool> for SaveStatus {
    fn from(value: bool) -> Self {
        if value {
            Self::Saved
        } else {
            Self::NotSaved
        }
    }
}

/// Working board plus its persistence.
pub struct BoardSession<S: KeyValueStorage> {
    store: BoardStore<S>,
    state: BoardState,
    locked: bool,
}

impl<S: KeyValueStorage> BoardSession<S> {
    /// Opens a session from persisted state, defaulting to the starter board.
    pub fn open(store: BoardStore<S>) -> Self {
        Self::open_with_default(store, &BoardState::starter())
    }

    /// Opens a session from persisted state, defaulting to `default`.
    pub fn open_with_default(store: BoardStore<S>, default: &BoardState) -> Self {
        let state = store.load(default);
        Self {
            store,
            state,
            locked: false,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn store(&self) -> &BoardStore<S> {
        &self.store
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn add_item(&mut self, raw_label: &str) -> BoardResult<SaveStatus> {
        self.apply("add_item", |state| board_ops::add_item(state, raw_label))
    }

    pub fn add_item_with_emoji(&mut self, raw_label: &str, emoji: &str) -> BoardResult<SaveStatus> {
        self.apply("add_item", |state| {
            board_ops::add_item_with_emoji(state, raw_label, emoji)
        })
    }

    pub fn rename_item(&mut self, id: &ItemId, raw_label: &str) -> BoardResult<SaveStatus> {
        self.apply("rename_item", |state| {
            board_ops::rename_item(state, id, raw_label)
        })
    }

    pub fn move_item(
        &mut self,
        id: &ItemId,
        target: ListKind,
        target_index: Option<i64>,
    ) -> BoardResult<SaveStatus> {
        self.apply("move_item", |state| {
            board_ops::move_item(state, id, target, target_index)
        })
    }

    pub fn move_rank(&mut self, id: &ItemId, direction: MoveDirection) -> BoardResult<SaveStatus> {
        self.apply("move_rank", |state| {
            board_ops::move_rank(state, id, direction)
        })
    }

    pub fn promote(&mut self, id: &ItemId) -> BoardResult<SaveStatus> {
        self.apply("promote", |state| board_ops::promote(state, id))
    }

    pub fn demote(&mut self, id: &ItemId) -> BoardResult<SaveStatus> {
        self.apply("demote", |state| board_ops::demote(state, id))
    }

    /// Shuffles the board with the thread-local generator.
    pub fn randomize(&mut self) -> BoardResult<SaveStatus> {
        self.randomize_with(&mut rand::rng())
    }

    /// Shuffles the board with a caller-provided generator.
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BoardResult<SaveStatus> {
        self.apply("randomize", |state| Ok(board_ops::randomize(state, rng)))
    }

    /// Restores the starter board, unlocks, and clears persisted storage.
    ///
    /// Allowed while locked.
    pub fn reset(&mut self) -> SaveStatus {
        self.state = board_ops::reset();
        self.locked = false;
        let cleared = self.store.clear();
        info!("event=board_reset module=session status=ok cleared={cleared}");
        cleared.into()
    }

    /// Seals the current ranking.
    ///
    /// # Errors
    /// - `NothingPrioritized` when no item is ranked.
    pub fn lock_in(&mut self) -> BoardResult<()> {
        if self.state.prioritized.is_empty() {
            return Err(BoardError::NothingPrioritized);
        }
        self.locked = true;
        info!(
            "event=board_lock module=session status=locked prioritized={}",
            self.state.prioritized.len()
        );
        Ok(())
    }

    pub fn unlock(&mut self) {
        self.locked = false;
        info!("event=board_lock module=session status=unlocked");
    }

    /// Share text for the current ranking; `None` when nothing is ranked.
    pub fn summary(&self, options: &SummaryOptions) -> Option<String> {
        format_summary(&self.state.prioritized, options)
    }

    fn apply(
        &mut self,
        op: &'static str,
        transition: impl FnOnce(&BoardState) -> BoardResult<BoardState>,
    ) -> BoardResult<SaveStatus> {
        if self.locked {
            debug!("event=board_mutation module=session op={op} status=rejected reason=locked");
            return Err(BoardError::BoardLocked);
        }

        let next = transition(&self.state).map_err(|err| {
            debug!(
                "event=board_mutation module=session op={op} status=rejected reason={}",
                err.code()
            );
            err
        })?;
        self.state = next;

        let status = SaveStatus::from(self.store.save(&self.state));
        if status == SaveStatus::NotSaved {
            warn!("event=board_mutation module=session op={op} status=ok saved=false");
        } else {
            debug!("event=board_mutation module=session op={op} status=ok saved=true");
        }
        Ok(status)
    }
}
