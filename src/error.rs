//! Crate-wide error type.
//!
//! One enum covers every failure the core can surface. [`FsError::class`]
//! groups the variants into the coarse taxonomy callers branch on.

use crate::store::StoreError;
use crate::tree::ItemKind;
use crate::types::{Address, UpdateId};
use thiserror::Error;

/// Coarse classification of an [`FsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed input: bad path, name, address, or action shape
    Validation,
    /// Duplicate or out-of-order update id
    Sequence,
    /// Missing/invalid signature, project mismatch, unregistered or
    /// mismatched actor
    Auth,
    /// Target already exists
    Conflict,
    /// Missing path segment, parent, or item to remove
    NotFound,
    /// Snapshot export/import failure
    Snapshot,
    /// Unsupported authentication scheme
    Unsupported,
}

/// Errors produced by the file system core.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    #[error("path must contain at least one component")]
    PathWithoutComponents,

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("user address is not valid: {0:?}")]
    InvalidAddress(String),

    #[error("update must carry between 1 and 100 actions, got {0}")]
    ActionCountInvalid(usize),

    #[error("update id must be greater than 0")]
    InvalidUpdateId,

    #[error("incomplete update: {0}")]
    IncompleteUpdate(&'static str),

    #[error("action {0:?} is not implemented")]
    ActionNotImplemented(&'static str),

    #[error("invalid anchor record: {0}")]
    InvalidAnchor(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("update with id {id} already exists")]
    DuplicateUpdate { id: UpdateId },

    #[error("update must be sequential: expected id {expected}, got {got}")]
    SequenceGap { expected: UpdateId, got: UpdateId },

    #[error("update signature is required")]
    MissingSignature,

    #[error("update signature is not valid")]
    BadSignature,

    #[error("project name is not valid: expected {expected:?}, got {got:?}")]
    ProjectMismatch { expected: String, got: String },

    #[error("user {0:?} is not registered")]
    UnregisteredActor(Address),

    #[error("actor {actor:?} does not match action target {target:?}")]
    ActorMismatch { actor: Address, target: Address },

    #[error("{kind} already exists: {name:?}")]
    AlreadyExists { kind: ItemKind, name: String },

    #[error("user with address {0:?} already exists")]
    UserExists(Address),

    #[error("directory with name {0:?} already exists")]
    UserDirectoryExists(Address),

    #[error("item not found: {0:?}")]
    NotFound(String),

    #[error("parent directory not found: {0:?}")]
    ParentNotFound(String),

    #[error("{kind} does not exist: {name:?}")]
    DoesNotExist { kind: ItemKind, name: String },

    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("user directory of {0:?} not found")]
    UserDirectoryMissing(Address),

    #[error("encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("authentication scheme {0:?} is not supported")]
    UnsupportedScheme(String),
}

impl FsError {
    /// Taxonomy class of this error.
    pub fn class(&self) -> ErrorClass {
        use FsError::*;
        match self {
            InvalidPath(_) | PathWithoutComponents | InvalidName(_) | InvalidAddress(_)
            | ActionCountInvalid(_) | InvalidUpdateId | IncompleteUpdate(_)
            | ActionNotImplemented(_) | InvalidAnchor(_) | Config(_) => ErrorClass::Validation,
            DuplicateUpdate { .. } | SequenceGap { .. } => ErrorClass::Sequence,
            MissingSignature | BadSignature | ProjectMismatch { .. } | UnregisteredActor(_)
            | ActorMismatch { .. } => ErrorClass::Auth,
            AlreadyExists { .. } | UserExists(_) | UserDirectoryExists(_) => ErrorClass::Conflict,
            NotFound(_) | ParentNotFound(_) | DoesNotExist { .. } => ErrorClass::NotFound,
            CorruptSnapshot(_) | UserDirectoryMissing(_) | Encode(_) | Store(_) => {
                ErrorClass::Snapshot
            }
            UnsupportedScheme(_) => ErrorClass::Unsupported,
        }
    }
}
