//! Directory tree data model.
//!
//! The tree is the materialized view of the update log: a single root
//! directory named `/` whose immediate children are the per-user root
//! directories (one per registered user, named by address) plus any
//! project-level items. File content is never stored here, only an opaque
//! content hash.

pub mod mutator;
pub mod path;

use crate::types::{Address, UpdateId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a named tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    File,
    Directory,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::File => write!(f, "file"),
            ItemKind::Directory => write!(f, "directory"),
        }
    }
}

/// File entry. Carries a content-addressing reference, never file bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub name: String,
    /// Opaque reference to content stored outside this system
    pub content_hash: String,
    pub mime_type: String,
    /// Size of the content in bytes
    pub size: u64,
    /// Update that created this file
    pub created_at_update_id: UpdateId,
}

/// Directory entry. Sibling names are unique per kind per level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    pub name: String,
    pub files: Vec<File>,
    pub subdirectories: Vec<Directory>,
    /// Address of the user who created the directory; empty for the root
    pub owner_address: Address,
    /// Update that created this directory; 0 for the root
    pub created_at_update_id: UpdateId,
}

impl Directory {
    /// Create an empty directory owned by `owner`.
    pub fn new(name: &str, owner: &str, created_at_update_id: UpdateId) -> Self {
        Self {
            name: name.to_string(),
            files: Vec::new(),
            subdirectories: Vec::new(),
            owner_address: owner.to_string(),
            created_at_update_id,
        }
    }

    /// The file-system root: named `/`, unowned, update id 0.
    pub fn root() -> Self {
        Self::new(path::ROOT, "", 0)
    }

    /// Find a direct subdirectory by name.
    pub fn subdirectory(&self, name: &str) -> Option<&Directory> {
        self.subdirectories.iter().find(|d| d.name == name)
    }

    /// Find a direct subdirectory by name, mutably.
    pub fn subdirectory_mut(&mut self, name: &str) -> Option<&mut Directory> {
        self.subdirectories.iter_mut().find(|d| d.name == name)
    }

    /// Find a direct file by name.
    pub fn file(&self, name: &str) -> Option<&File> {
        self.files.iter().find(|f| f.name == name)
    }

    /// Whether a direct child of the given kind and name exists.
    pub fn has_child(&self, name: &str, kind: ItemKind) -> bool {
        match kind {
            ItemKind::File => self.file(name).is_some(),
            ItemKind::Directory => self.subdirectory(name).is_some(),
        }
    }
}

/// The whole tree: one root directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub directory: Directory,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            directory: Directory::root(),
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
