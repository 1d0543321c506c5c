//! Board use-case services.
//!
//! # Responsibility
//! - Expose pure board transitions to presentation layers.
//! - Wrap transitions with lock-in and persistence in a session.
//! - Format the shareable ranking summary.

pub mod board_ops;
pub mod session;
pub mod summary;
