//! Core types for the signed-update virtual file system.

use serde::{Deserialize, Serialize};

/// Address: 64-character lowercase hex string that identifies a user and
/// doubles as that user's public key. Also names the user's root directory.
pub type Address = String;

/// UpdateId: per-user strictly increasing update counter, starting at 1.
pub type UpdateId = u64;

/// Length of an [`Address`] in hex characters.
pub const ADDRESS_LENGTH: usize = 64;

/// A registered user of the file system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Address (public key) of the user
    pub address: Address,
}
