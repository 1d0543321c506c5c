//! Board persistence and record migration.
//!
//! # Responsibility
//! - Define the load/save/clear contract over injected key-value storage.
//! - Keep record coercion rules in one side-effect-free module.
//!
//! # Invariants
//! - Storage and parse failures never cross this layer.
//! - Loaded boards satisfy the partition and label uniqueness rules.

pub mod board_store;
pub mod migrate;
