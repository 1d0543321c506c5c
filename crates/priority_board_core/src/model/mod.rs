//! Board domain model.
//!
//! # Responsibility
//! - Define the canonical item and board snapshot shapes.
//! - Own label normalization and the fixed starter set.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - An item lives in exactly one of the two board lists.
//! - Normalized labels are unique across the whole board.

pub mod board;
pub mod item;
