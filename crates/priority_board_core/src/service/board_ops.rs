//! Pure board transitions.
//!
//! # Responsibility
//! - Validate user input (labels, ids) against board invariants.
//! - Produce the next snapshot for add, rename, move, rank and shuffle
//!   gestures.
//!
//! # Invariants
//! - No function mutates its input snapshot.
//! - Rejections happen before any change; there is no partial application.
//! - Every returned snapshot satisfies `BoardState::check_invariants`.

use crate::model::board::{BoardState, ListKind, MoveDirection};
use crate::model::item::{normalize_label, now_epoch_ms, Item, ItemId, DEFAULT_EMOJI};
use rand::seq::SliceRandom;
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by board transitions.
pub type BoardResult<T> = Result<T, BoardError>;

/// Typed rejection reasons surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Label is blank after trim.
    EmptyLabel,
    /// Another item already uses this label (case-insensitive, trimmed).
    DuplicateLabel(String),
    /// No list holds the referenced id, or not the list the gesture needs.
    ItemNotFound(ItemId),
    /// Board is locked in; mutations are refused until unlocked.
    BoardLocked,
    /// Lock-in requested with nothing ranked.
    NothingPrioritized,
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLabel => write!(f, "label must not be blank"),
            Self::DuplicateLabel(label) => write!(f, "label already exists: {label}"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::BoardLocked => write!(f, "board is locked in; unlock to keep editing"),
            Self::NothingPrioritized => write!(f, "no prioritized items to lock in"),
        }
    }
}

impl Error for BoardError {}

impl BoardError {
    /// Stable reason code for logs; never carries user text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyLabel => "empty_label",
            Self::DuplicateLabel(_) => "duplicate_label",
            Self::ItemNotFound(_) => "item_not_found",
            Self::BoardLocked => "board_locked",
            Self::NothingPrioritized => "nothing_prioritized",
        }
    }
}

/// Adds a new item with the default glyph at the top of the unranked pool.
pub fn add_item(state: &BoardState, raw_label: &str) -> BoardResult<BoardState> {
    add_item_with_emoji(state, raw_label, DEFAULT_EMOJI)
}

/// Adds a new item with a caller-chosen glyph.
///
/// # Errors
/// - `EmptyLabel` when `raw_label` is blank.
/// - `DuplicateLabel` when the trimmed label collides with any item.
pub fn add_item_with_emoji(
    state: &BoardState,
    raw_label: &str,
    emoji: &str,
) -> BoardResult<BoardState> {
    let label = normalize_input(raw_label)?;
    if is_duplicate_label(&label, state.items(), None) {
        return Err(BoardError::DuplicateLabel(label));
    }

    let mut unprioritized = Vec::with_capacity(state.unprioritized.len() + 1);
    unprioritized.push(Item::with_emoji(&label, emoji));
    unprioritized.extend(state.unprioritized.iter().cloned());
    Ok(state.with_list(ListKind::Unprioritized, unprioritized))
}

/// Renames one item in whichever list holds it.
///
/// Renaming to the current label is an idempotent success and returns the
/// snapshot unchanged.
///
/// # Errors
/// - `EmptyLabel` when `raw_label` is blank.
/// - `ItemNotFound` when no list holds `id`.
/// - `DuplicateLabel` when the label collides with another item.
pub fn rename_item(state: &BoardState, id: &ItemId, raw_label: &str) -> BoardResult<BoardState> {
    let label = normalize_input(raw_label)?;
    let (kind, index) = locate(state, id)?;
    let current = &state.list(kind)[index];
    if current.label == label {
        return Ok(state.clone());
    }
    if is_duplicate_label(&label, state.items(), Some(id)) {
        return Err(BoardError::DuplicateLabel(label));
    }

    let mut items = state.list(kind).to_vec();
    items[index] = current.relabeled(&label, now_epoch_ms());
    Ok(state.with_list(kind, items))
}

/// Moves one item to `target`, optionally at a ranked position.
///
/// For `Prioritized`, `target_index` is clamped to `[0, len]` where `len` is
/// measured after the item left its source list; `None` appends. Moving to
/// `Unprioritized` always appends.
///
/// # Errors
/// - `ItemNotFound` when no list holds `id`.
pub fn move_item(
    state: &BoardState,
    id: &ItemId,
    target: ListKind,
    target_index: Option<i64>,
) -> BoardResult<BoardState> {
    let (source, index) = locate(state, id)?;
    let mut source_items = state.list(source).to_vec();
    let item = source_items.remove(index);

    if source == target {
        insert_into(&mut source_items, item, target, target_index);
        return Ok(state.with_list(source, source_items));
    }

    let mut target_items = state.list(target).to_vec();
    insert_into(&mut target_items, item, target, target_index);
    Ok(state
        .with_list(source, source_items)
        .with_list(target, target_items))
}

/// Swaps a ranked item with its neighbour.
///
/// Moving the first item up or the last item down is a no-op that returns
/// the snapshot unchanged.
///
/// # Errors
/// - `ItemNotFound` when `id` is not ranked.
pub fn move_rank(
    state: &BoardState,
    id: &ItemId,
    direction: MoveDirection,
) -> BoardResult<BoardState> {
    let index = position_in(state, ListKind::Prioritized, id)?;
    let neighbour = match direction {
        MoveDirection::Up => index.checked_sub(1),
        MoveDirection::Down => Some(index + 1).filter(|next| *next < state.prioritized.len()),
    };
    let Some(neighbour) = neighbour else {
        return Ok(state.clone());
    };

    let mut items = state.prioritized.to_vec();
    items.swap(index, neighbour);
    Ok(state.with_list(ListKind::Prioritized, items))
}

/// Moves an unranked item to the bottom of the ranking.
///
/// # Errors
/// - `ItemNotFound` when `id` is not in the unranked pool.
pub fn promote(state: &BoardState, id: &ItemId) -> BoardResult<BoardState> {
    position_in(state, ListKind::Unprioritized, id)?;
    move_item(state, id, ListKind::Prioritized, None)
}

/// Moves a ranked item back to the end of the unranked pool.
///
/// # Errors
/// - `ItemNotFound` when `id` is not ranked.
pub fn demote(state: &BoardState, id: &ItemId) -> BoardResult<BoardState> {
    position_in(state, ListKind::Prioritized, id)?;
    move_item(state, id, ListKind::Unprioritized, None)
}

/// Shuffles every item uniformly and ranks the first half.
///
/// The pool is unprioritized followed by prioritized; after a Fisher-Yates
/// shuffle the first `floor(n / 2)` items become the ranking.
pub fn randomize<R: Rng + ?Sized>(state: &BoardState, rng: &mut R) -> BoardState {
    let mut pool: Vec<Item> = state.items().cloned().collect();
    pool.shuffle(rng);
    let unprioritized = pool.split_off(pool.len() / 2);
    BoardState {
        unprioritized: unprioritized.into(),
        prioritized: pool.into(),
        version: state.version,
    }
}

/// [`randomize`] driven by the thread-local generator.
pub fn randomize_with_thread_rng(state: &BoardState) -> BoardState {
    randomize(state, &mut rand::rng())
}

/// Canonical default board. Persisted storage should be cleared alongside.
pub fn reset() -> BoardState {
    BoardState::starter()
}

/// Whether `label` collides with any item except `exclude_id`.
///
/// Comparison is case-insensitive on trimmed text.
pub fn is_duplicate_label<'a>(
    label: &str,
    items: impl IntoIterator<Item = &'a Item>,
    exclude_id: Option<&ItemId>,
) -> bool {
    let normalized = normalize_label(label);
    items
        .into_iter()
        .any(|item| Some(&item.id) != exclude_id && item.normalized_label() == normalized)
}

fn normalize_input(raw_label: &str) -> BoardResult<String> {
    let trimmed = raw_label.trim();
    if trimmed.is_empty() {
        return Err(BoardError::EmptyLabel);
    }
    Ok(trimmed.to_string())
}

fn locate(state: &BoardState, id: &ItemId) -> BoardResult<(ListKind, usize)> {
    state
        .locate(id)
        .ok_or_else(|| BoardError::ItemNotFound(id.clone()))
}

fn position_in(state: &BoardState, kind: ListKind, id: &ItemId) -> BoardResult<usize> {
    state
        .list(kind)
        .iter()
        .position(|item| &item.id == id)
        .ok_or_else(|| BoardError::ItemNotFound(id.clone()))
}

fn insert_into(items: &mut Vec<Item>, item: Item, target: ListKind, target_index: Option<i64>) {
    match (target, target_index) {
        (ListKind::Prioritized, Some(index)) => {
            let len = items.len() as i64;
            items.insert(index.clamp(0, len) as usize, item);
        }
        _ => items.push(item),
    }
}

#[cfg(test)]
mod tests {
    use super::{insert_into, normalize_input, BoardError};
    use crate::model::board::ListKind;
    use crate::model::item::{Item, ItemId};

    fn item(id: &str) -> Item {
        Item::with_id(ItemId::new(id), format!("label {id}"), "", 1)
    }

    #[test]
    fn normalize_input_rejects_whitespace_only() {
        assert_eq!(normalize_input(" \t\n"), Err(BoardError::EmptyLabel));
        assert_eq!(normalize_input("  Trip "), Ok("Trip".to_string()));
    }

    #[test]
    fn insert_into_clamps_out_of_range_indices() {
        let mut items = vec![item("a"), item("b")];
        insert_into(&mut items, item("c"), ListKind::Prioritized, Some(99));
        insert_into(&mut items, item("d"), ListKind::Prioritized, Some(-4));
        let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn insert_into_unprioritized_ignores_index() {
        let mut items = vec![item("a"), item("b")];
        insert_into(&mut items, item("c"), ListKind::Unprioritized, Some(0));
        assert_eq!(items[2].id.as_str(), "c");
    }
}
