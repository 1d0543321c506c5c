//! Board snapshot model.
//!
//! # Responsibility
//! - Hold the two ordered item lists and the schema version.
//! - Provide lookup helpers and an invariant checker for the partition and
//!   label uniqueness rules.
//!
//! # Invariants
//! - Snapshots are immutable once built; transitions build new snapshots.
//! - Lists untouched by a transition are shared by `Arc`, never copied.
//! - `prioritized` order is the ranking: rank = index + 1.

use crate::model::item::{normalize_label, Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Schema version written by this crate.
pub const CURRENT_VERSION: u32 = 1;

const STARTER_ITEMS: &[(&str, &str)] = &[
    ("Cartier bag", "👜"),
    ("Wedding", "💒"),
    ("Proposal", "💍"),
    ("Buying a house", "🏠"),
    ("Buying a car", "🚗"),
    ("Getting children", "👶"),
    ("Photoshoot", "📸"),
    ("Buying makeup", "💄"),
    ("Weekend Paris trip", "🗼"),
    ("Spa day", "🧖‍♀️"),
    ("Matching pajamas", "👔"),
    ("Sushi date night", "🍣"),
    ("Dyson Airwrap", "💇‍♀️"),
    ("Jewelry (mysterious box)", "💎"),
    ("Cat/dog adoption \"trial\"", "🐱"),
    ("Fancy dinner with dress code", "🍷"),
    ("New handbag \"for science\"", "🔬"),
    ("Couples cooking class", "👨‍🍳"),
    ("Netherlands weekend getaway", "🌷"),
    ("One (1) irrational purchase", "🤪"),
];

/// Which of the two board lists an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    /// Unranked pool. Order is stable but carries no meaning.
    Unprioritized,
    /// Ranked list. Index 0 is rank 1.
    Prioritized,
}

/// Direction for single-step rank changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards rank 1.
    Up,
    /// Away from rank 1.
    Down,
}

/// First invariant violation found by [`BoardState::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Same id appears more than once across both lists.
    DuplicateId(ItemId),
    /// Two items share a normalized label.
    DuplicateLabel(String),
    /// Item label is blank after trim.
    BlankLabel(ItemId),
    /// `updated_at` is earlier than `created_at`.
    TimestampOrder(ItemId),
}

impl Display for InvariantViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "item id appears more than once: {id}"),
            Self::DuplicateLabel(label) => write!(f, "normalized label is not unique: {label}"),
            Self::BlankLabel(id) => write!(f, "item label is blank: {id}"),
            Self::TimestampOrder(id) => {
                write!(f, "item updated_at is earlier than created_at: {id}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

/// Complete board snapshot, also the persisted record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub unprioritized: Arc<Vec<Item>>,
    pub prioritized: Arc<Vec<Item>>,
    pub version: u32,
}

impl BoardState {
    /// Builds a snapshot at [`CURRENT_VERSION`].
    pub fn new(unprioritized: Vec<Item>, prioritized: Vec<Item>) -> Self {
        Self {
            unprioritized: Arc::new(unprioritized),
            prioritized: Arc::new(prioritized),
            version: CURRENT_VERSION,
        }
    }

    /// Board with no items at all.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Canonical first-run board: the fixed starter set, nothing ranked.
    pub fn starter() -> Self {
        let items = STARTER_ITEMS
            .iter()
            .enumerate()
            .map(|(index, (label, emoji))| {
                let ordinal = index as i64 + 1;
                Item::with_id(ItemId::new(ordinal.to_string()), label, emoji, ordinal)
            })
            .collect();
        Self::new(items, Vec::new())
    }

    /// Returns the items of one list in display order.
    pub fn list(&self, kind: ListKind) -> &[Item] {
        match kind {
            ListKind::Unprioritized => &self.unprioritized,
            ListKind::Prioritized => &self.prioritized,
        }
    }

    /// Iterates every item: unprioritized first, then prioritized.
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.unprioritized.iter().chain(self.prioritized.iter())
    }

    /// Total number of items on the board.
    pub fn len(&self) -> usize {
        self.unprioritized.len() + self.prioritized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds the list and index currently holding `id`.
    pub fn locate(&self, id: &ItemId) -> Option<(ListKind, usize)> {
        [ListKind::Unprioritized, ListKind::Prioritized]
            .into_iter()
            .find_map(|kind| {
                self.list(kind)
                    .iter()
                    .position(|item| &item.id == id)
                    .map(|index| (kind, index))
            })
    }

    /// Looks up one item by id in either list.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.locate(id).map(|(kind, index)| &self.list(kind)[index])
    }

    /// Returns the 1-based rank of a prioritized item.
    pub fn rank_of(&self, id: &ItemId) -> Option<usize> {
        self.prioritized
            .iter()
            .position(|item| &item.id == id)
            .map(|index| index + 1)
    }

    /// Returns a snapshot with one list replaced and the other shared.
    pub fn with_list(&self, kind: ListKind, items: Vec<Item>) -> Self {
        let mut next = self.clone();
        match kind {
            ListKind::Unprioritized => next.unprioritized = Arc::new(items),
            ListKind::Prioritized => next.prioritized = Arc::new(items),
        }
        next
    }

    /// Whether both snapshots hold the very same allocation for `kind`.
    pub fn shares_list_with(&self, other: &BoardState, kind: ListKind) -> bool {
        match kind {
            ListKind::Unprioritized => Arc::ptr_eq(&self.unprioritized, &other.unprioritized),
            ListKind::Prioritized => Arc::ptr_eq(&self.prioritized, &other.prioritized),
        }
    }

    /// Verifies partition, label uniqueness and timestamp ordering.
    ///
    /// # Errors
    /// - Returns the first violation found, scanning unprioritized first.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut ids = HashSet::with_capacity(self.len());
        let mut labels = HashSet::with_capacity(self.len());
        for item in self.items() {
            if !ids.insert(&item.id) {
                return Err(InvariantViolation::DuplicateId(item.id.clone()));
            }
            let normalized = normalize_label(&item.label);
            if normalized.is_empty() {
                return Err(InvariantViolation::BlankLabel(item.id.clone()));
            }
            if !labels.insert(normalized.clone()) {
                return Err(InvariantViolation::DuplicateLabel(normalized));
            }
            if item.updated_at < item.created_at {
                return Err(InvariantViolation::TimestampOrder(item.id.clone()));
            }
        }
        Ok(())
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::starter()
    }
}
