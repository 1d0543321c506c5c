//! Board persistence over an injected key-value storage.
//!
//! # Responsibility
//! - Load, save and clear the board record under one fixed key.
//! - Absorb every storage and parse failure at this boundary.
//!
//! # Invariants
//! - `load` never fails; any problem yields the caller's default board.
//! - `save`/`clear` report success as `bool` and never propagate errors.
//! - When the availability probe fails, every operation is a no-op.

use crate::model::board::BoardState;
use crate::model::item::now_epoch_ms;
use crate::repo::migrate::migrate_record;
use crate::storage::KeyValueStorage;
use log::{debug, info, warn};

/// Key the board record is stored under.
pub const STORAGE_KEY: &str = "priority-board-v2";

const PROBE_KEY: &str = "__storage_test__";

/// Load/save/clear contract for the persisted board record.
pub struct BoardStore<S: KeyValueStorage> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> BoardStore<S> {
    /// Creates a store that uses [`STORAGE_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    /// Creates a store that uses a custom record key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Probes storage with a throwaway write followed by a delete.
    pub fn is_available(&self) -> bool {
        let result = self
            .storage
            .set(PROBE_KEY, PROBE_KEY)
            .and_then(|()| self.storage.remove(PROBE_KEY));
        if let Err(err) = &result {
            debug!("event=storage_probe module=store status=unavailable error={err}");
        }
        result.is_ok()
    }

    /// Loads the persisted board, or a clone of `default` when there is none.
    ///
    /// Parsed records are migrated item by item, so older or partial shapes
    /// still load.
    pub fn load(&self, default: &BoardState) -> BoardState {
        if !self.is_available() {
            info!("event=board_load module=store status=fallback reason=storage_unavailable");
            return default.clone();
        }

        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => {
                debug!("event=board_load module=store status=fallback reason=missing_key");
                return default.clone();
            }
            Err(err) => {
                warn!(
                    "event=board_load module=store status=fallback reason=read_error error={err}"
                );
                return default.clone();
            }
        };

        match migrate_record(&raw, now_epoch_ms()) {
            Ok(migrated) => {
                if migrated.repaired > 0 {
                    warn!(
                        "event=board_load module=store status=repaired repaired_items={}",
                        migrated.repaired
                    );
                }
                info!(
                    "event=board_load module=store status=ok version={} unprioritized={} prioritized={}",
                    migrated.state.version,
                    migrated.state.unprioritized.len(),
                    migrated.state.prioritized.len()
                );
                migrated.state
            }
            Err(rejection) => {
                warn!(
                    "event=board_load module=store status=fallback reason={} error={rejection}",
                    rejection.reason_code()
                );
                default.clone()
            }
        }
    }

    /// Serializes and writes the full board. Returns whether it was stored.
    pub fn save(&self, state: &BoardState) -> bool {
        if !self.is_available() {
            return false;
        }

        let payload = match serde_json::to_string(state) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("event=board_save module=store status=error reason=serialize error={err}");
                return false;
            }
        };

        match self.storage.set(&self.key, &payload) {
            Ok(()) => {
                debug!(
                    "event=board_save module=store status=ok bytes={}",
                    payload.len()
                );
                true
            }
            Err(err) => {
                warn!("event=board_save module=store status=error reason=write error={err}");
                false
            }
        }
    }

    /// Removes the persisted record. Returns whether removal succeeded.
    pub fn clear(&self) -> bool {
        if !self.is_available() {
            return false;
        }

        match self.storage.remove(&self.key) {
            Ok(()) => {
                info!("event=board_clear module=store status=ok");
                true
            }
            Err(err) => {
                warn!("event=board_clear module=store status=error error={err}");
                false
            }
        }
    }
}
