//! Item domain model.
//!
//! # Responsibility
//! - Define the record users rank on the board.
//! - Provide label normalization shared by validation and migration.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `label` is stored trimmed and is never blank.
//! - `updated_at` is never earlier than `created_at`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Glyph used when an item is created or migrated without one.
pub const DEFAULT_EMOJI: &str = "✨";

/// Opaque stable identifier of a board item.
///
/// Starter items use short numeric strings; items created at runtime use
/// UUID v4 strings. Callers must not rely on either shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps an existing identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh identifier that no other item uses.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One rankable entry on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    /// User-visible text, already trimmed.
    pub label: String,
    pub emoji: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Only label edits move this forward.
    pub updated_at: i64,
}

impl Item {
    /// Creates an item with a fresh id and the default glyph.
    pub fn new(label: impl AsRef<str>) -> Self {
        Self::with_emoji(label, DEFAULT_EMOJI)
    }

    /// Creates an item with a fresh id and the given glyph.
    ///
    /// A blank glyph falls back to [`DEFAULT_EMOJI`].
    pub fn with_emoji(label: impl AsRef<str>, emoji: impl AsRef<str>) -> Self {
        let now = now_epoch_ms();
        Self::with_id(ItemId::generate(), label, emoji, now)
    }

    /// Creates an item with a caller-provided id and creation time.
    ///
    /// Used for the starter set and by record migration, where identity
    /// already exists.
    pub fn with_id(
        id: ItemId,
        label: impl AsRef<str>,
        emoji: impl AsRef<str>,
        created_at: i64,
    ) -> Self {
        let emoji = emoji.as_ref().trim();
        Self {
            id,
            label: label.as_ref().trim().to_string(),
            emoji: if emoji.is_empty() {
                DEFAULT_EMOJI.to_string()
            } else {
                emoji.to_string()
            },
            created_at,
            updated_at: created_at,
        }
    }

    /// Returns a copy carrying a new label.
    ///
    /// `id` and `created_at` are kept; `updated_at` moves to `now` but never
    /// behind `created_at`.
    pub fn relabeled(&self, label: impl AsRef<str>, now: i64) -> Self {
        Self {
            label: label.as_ref().trim().to_string(),
            updated_at: now.max(self.created_at).max(self.updated_at),
            ..self.clone()
        }
    }

    /// Label form used for uniqueness comparison.
    pub fn normalized_label(&self) -> String {
        normalize_label(&self.label)
    }
}

/// Trims and lowercases a label for case-insensitive comparison.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Falls back to `0` if the system clock reports a time before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{normalize_label, Item, ItemId, DEFAULT_EMOJI};

    #[test]
    fn normalize_label_trims_and_lowercases() {
        assert_eq!(normalize_label("  Paris TRIP \t"), "paris trip");
    }

    #[test]
    fn with_id_trims_label_and_defaults_blank_emoji() {
        let item = Item::with_id(ItemId::new("7"), "  Photoshoot ", "  ", 7);
        assert_eq!(item.label, "Photoshoot");
        assert_eq!(item.emoji, DEFAULT_EMOJI);
        assert_eq!(item.created_at, 7);
        assert_eq!(item.updated_at, 7);
    }

    #[test]
    fn relabeled_never_moves_updated_at_backwards() {
        let item = Item::with_id(ItemId::new("1"), "Spa day", "🧖", 500);
        let renamed = item.relabeled("Spa weekend", 100);
        assert_eq!(renamed.id, item.id);
        assert_eq!(renamed.created_at, 500);
        assert_eq!(renamed.updated_at, 500);
        assert_eq!(renamed.label, "Spa weekend");
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }
}
