//! Coercion of persisted board records into valid snapshots.
//!
//! # Responsibility
//! - Turn any parsed JSON record into a `BoardState` or a rejection reason.
//! - Fill missing or legacy item fields with defaults.
//! - Repair duplicate ids and labels so loaded boards keep the invariants.
//!
//! # Invariants
//! - Coercion is total for items: every JSON value becomes a valid `Item`.
//! - A well-formed record comes back unchanged (no id or timestamp churn).
//! - Nothing here touches storage or logging.

use crate::model::board::BoardState;
use crate::model::item::{normalize_label, Item, ItemId, DEFAULT_EMOJI};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Label given to migrated items that carry neither `label` nor `text`.
pub const PLACEHOLDER_LABEL: &str = "Unknown";

/// Version assumed for records written before versioning existed.
pub const LEGACY_VERSION: u32 = 1;

/// Why a persisted record could not be used at all.
#[derive(Debug)]
pub enum RecordRejection {
    /// Stored text is not JSON.
    Parse(serde_json::Error),
    /// Top-level JSON value is not an object.
    NotAnObject,
    /// A list field is missing or not an array.
    ListNotArray(&'static str),
}

impl RecordRejection {
    /// Short machine-friendly reason used in log events.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse_error",
            Self::NotAnObject => "not_an_object",
            Self::ListNotArray(_) => "list_not_array",
        }
    }
}

impl Display for RecordRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "board record is not valid JSON: {err}"),
            Self::NotAnObject => write!(f, "board record is not a JSON object"),
            Self::ListNotArray(field) => write!(f, "board record field `{field}` is not an array"),
        }
    }
}

impl std::error::Error for RecordRejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Outcome of a successful record migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedBoard {
    pub state: BoardState,
    /// Items dropped or relabeled to restore the invariants.
    pub repaired: usize,
}

/// Parses and migrates stored text.
///
/// # Errors
/// - Returns a `RecordRejection` when the text is not a usable record; the
///   caller falls back to its default board.
pub fn migrate_record(raw: &str, now: i64) -> Result<MigratedBoard, RecordRejection> {
    let value: Value = serde_json::from_str(raw).map_err(RecordRejection::Parse)?;
    migrate_value(&value, now)
}

/// Migrates an already parsed record.
///
/// # Errors
/// - `NotAnObject` when `value` is not a JSON object.
/// - `ListNotArray` when either list field is not an array.
pub fn migrate_value(value: &Value, now: i64) -> Result<MigratedBoard, RecordRejection> {
    let record = value.as_object().ok_or(RecordRejection::NotAnObject)?;
    let unprioritized = list_field(record, "unprioritized")?;
    let prioritized = list_field(record, "prioritized")?;

    let prioritized: Vec<Item> = prioritized
        .iter()
        .map(|item| migrate_item(item, now))
        .collect();
    let unprioritized: Vec<Item> = unprioritized
        .iter()
        .map(|item| migrate_item(item, now))
        .collect();

    let mut repair = Repair::default();
    let prioritized = repair.apply(prioritized);
    let unprioritized = repair.apply(unprioritized);

    Ok(MigratedBoard {
        state: BoardState {
            unprioritized: Arc::new(unprioritized),
            prioritized: Arc::new(prioritized),
            version: migrate_version(record.get("version")),
        },
        repaired: repair.repaired,
    })
}

/// Coerces one untrusted value into a valid item.
///
/// Field rules:
/// - `id`: non-empty string or non-zero number, else a fresh id.
/// - `label`: non-blank `label`, else non-blank legacy `text`, else
///   [`PLACEHOLDER_LABEL`].
/// - `emoji`: non-blank string, else [`DEFAULT_EMOJI`].
/// - `createdAt`/`updatedAt`: non-zero finite numbers, else `now`.
///
/// Non-object values are treated as an empty object.
pub fn migrate_item(value: &Value, now: i64) -> Item {
    let id = match value.get("id") {
        Some(Value::String(id)) if !id.is_empty() => ItemId::new(id.as_str()),
        Some(Value::Number(id)) if id.as_f64().is_some_and(|n| n != 0.0) => {
            ItemId::new(id.to_string())
        }
        _ => ItemId::generate(),
    };
    let label = non_blank_str(value, "label")
        .or_else(|| non_blank_str(value, "text"))
        .unwrap_or(PLACEHOLDER_LABEL);
    let emoji = non_blank_str(value, "emoji").unwrap_or(DEFAULT_EMOJI);
    let created_at = timestamp(value, "createdAt").unwrap_or(now);
    let updated_at = timestamp(value, "updatedAt").unwrap_or(now);

    Item {
        id,
        label: label.trim().to_string(),
        emoji: emoji.to_string(),
        created_at,
        updated_at: updated_at.max(created_at),
    }
}

fn list_field<'a>(
    record: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Vec<Value>, RecordRejection> {
    record
        .get(field)
        .and_then(Value::as_array)
        .ok_or(RecordRejection::ListNotArray(field))
}

fn migrate_version(value: Option<&Value>) -> u32 {
    value
        .and_then(Value::as_u64)
        .filter(|version| *version > 0)
        .and_then(|version| u32::try_from(version).ok())
        .unwrap_or(LEGACY_VERSION)
}

fn non_blank_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

fn timestamp(value: &Value, field: &str) -> Option<i64> {
    let number = value.get(field)?;
    let millis = match number.as_i64() {
        Some(exact) => exact,
        None => {
            let float = number.as_f64().filter(|float| float.is_finite())?;
            float.trunc() as i64
        }
    };
    (millis != 0).then_some(millis)
}

/// Tracks ids and labels already kept while scanning lists in order.
#[derive(Default)]
struct Repair {
    ids: HashSet<ItemId>,
    labels: HashSet<String>,
    repaired: usize,
}

impl Repair {
    fn apply(&mut self, items: Vec<Item>) -> Vec<Item> {
        items
            .into_iter()
            .filter_map(|item| self.keep(item))
            .collect()
    }

    fn keep(&mut self, mut item: Item) -> Option<Item> {
        if !self.ids.insert(item.id.clone()) {
            self.repaired += 1;
            return None;
        }
        if !self.labels.insert(item.normalized_label()) {
            item.label = self.disambiguate(&item.label);
            self.labels.insert(item.normalized_label());
            self.repaired += 1;
        }
        Some(item)
    }

    fn disambiguate(&self, label: &str) -> String {
        let mut suffix = 2usize;
        loop {
            let candidate = format!("{label} ({suffix})");
            if !self.labels.contains(&normalize_label(&candidate)) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{migrate_item, timestamp, PLACEHOLDER_LABEL};
    use crate::model::item::DEFAULT_EMOJI;
    use serde_json::json;

    #[test]
    fn timestamp_accepts_floats_and_rejects_zero() {
        let value = json!({ "a": 12.9, "b": 0, "c": "12", "d": -5 });
        assert_eq!(timestamp(&value, "a"), Some(12));
        assert_eq!(timestamp(&value, "b"), None);
        assert_eq!(timestamp(&value, "c"), None);
        assert_eq!(timestamp(&value, "d"), Some(-5));
        assert_eq!(timestamp(&value, "missing"), None);
    }

    #[test]
    fn non_object_item_becomes_placeholder() {
        let item = migrate_item(&json!(42), 1_000);
        assert_eq!(item.label, PLACEHOLDER_LABEL);
        assert_eq!(item.emoji, DEFAULT_EMOJI);
        assert_eq!(item.created_at, 1_000);
        assert_eq!(item.updated_at, 1_000);
        assert!(!item.id.as_str().is_empty());
    }

    #[test]
    fn numeric_legacy_id_is_kept_as_text() {
        let item = migrate_item(&json!({ "id": 17, "text": "Spa day" }), 5);
        assert_eq!(item.id.as_str(), "17");
        assert_eq!(item.label, "Spa day");
    }

    #[test]
    fn updated_at_is_raised_to_created_at() {
        let item = migrate_item(
            &json!({ "id": "x", "label": "A", "createdAt": 50, "updatedAt": 10 }),
            99,
        );
        assert_eq!(item.created_at, 50);
        assert_eq!(item.updated_at, 50);
    }
}
