//! Signed updates: the append log's unit of change.
//!
//! An update is one authenticated batch of actions from one user. The
//! [`action`] module defines the action kinds; [`log`] builds, signs, and
//! validates updates.

pub mod action;
pub mod log;

pub use action::Action;
pub use log::{SignedUpdate, UpdateLog};

/// Maximum number of actions a single update may carry.
pub const MAX_ACTIONS_PER_UPDATE: usize = 100;
