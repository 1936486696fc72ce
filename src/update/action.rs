//! Action kinds carried by an update.
//!
//! An action is a tagged union on the wire: `{actionType, actionData}`.
//! Each kind carries its own typed payload; the engine dispatches on the
//! variant. Several kinds are reserved in the wire format but not yet
//! implemented by the engine.

use crate::types::Address;
use serde::{Deserialize, Serialize};

/// Register the acting user. Self-registration only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserAction {
    /// Address (public key) of the user to register
    pub user_address: Address,
}

/// Add a file under the actor's subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFileAction {
    /// Path of the file inside the actor's subtree
    pub path: String,
    /// Opaque reference to the file content
    pub content_hash: String,
    pub mime_type: String,
    pub size: u64,
}

/// Add a directory under the actor's subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddDirectoryAction {
    pub path: String,
}

/// Remove a file from the actor's subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveFileAction {
    pub path: String,
}

/// Remove a directory (and its entire subtree) from the actor's subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveDirectoryAction {
    pub path: String,
}

/// Reserved: unregister a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveUserAction {
    pub user_address: Address,
}

/// Reserved: replace a file's content reference in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyFileAction {
    pub path: String,
    pub content_hash: String,
    pub mime_type: String,
    pub size: u64,
}

/// Reserved: move a file to a new path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFileAction {
    pub path: String,
    pub new_path: String,
}

/// Reserved: change a directory's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyDirectoryAction {
    pub path: String,
}

/// Reserved: move a directory to a new path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveDirectoryAction {
    pub path: String,
    pub new_path: String,
}

/// One action of an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "actionType", content = "actionData")]
pub enum Action {
    #[serde(rename = "ADD_USER")]
    AddUser(AddUserAction),
    #[serde(rename = "ADD_FILE")]
    AddFile(AddFileAction),
    #[serde(rename = "ADD_DIRECTORY")]
    AddDirectory(AddDirectoryAction),
    #[serde(rename = "REMOVE_FILE")]
    RemoveFile(RemoveFileAction),
    #[serde(rename = "REMOVE_DIRECTORY")]
    RemoveDirectory(RemoveDirectoryAction),
    #[serde(rename = "REMOVE_USER")]
    RemoveUser(RemoveUserAction),
    #[serde(rename = "MODIFY_FILE")]
    ModifyFile(ModifyFileAction),
    #[serde(rename = "MOVE_FILE")]
    MoveFile(MoveFileAction),
    #[serde(rename = "MODIFY_DIRECTORY")]
    ModifyDirectory(ModifyDirectoryAction),
    #[serde(rename = "MOVE_DIRECTORY")]
    MoveDirectory(MoveDirectoryAction),
}

impl Action {
    /// Register the acting user.
    pub fn add_user(user_address: impl Into<Address>) -> Self {
        Action::AddUser(AddUserAction {
            user_address: user_address.into(),
        })
    }

    /// Add a file at `path` with the given content reference.
    pub fn add_file(
        path: impl Into<String>,
        content_hash: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Action::AddFile(AddFileAction {
            path: path.into(),
            content_hash: content_hash.into(),
            mime_type: mime_type.into(),
            size,
        })
    }

    /// Add a directory at `path`.
    pub fn add_directory(path: impl Into<String>) -> Self {
        Action::AddDirectory(AddDirectoryAction { path: path.into() })
    }

    /// Remove the file at `path`.
    pub fn remove_file(path: impl Into<String>) -> Self {
        Action::RemoveFile(RemoveFileAction { path: path.into() })
    }

    /// Remove the directory at `path` and everything below it.
    pub fn remove_directory(path: impl Into<String>) -> Self {
        Action::RemoveDirectory(RemoveDirectoryAction { path: path.into() })
    }

    /// Wire tag of this action kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::AddUser(_) => "ADD_USER",
            Action::AddFile(_) => "ADD_FILE",
            Action::AddDirectory(_) => "ADD_DIRECTORY",
            Action::RemoveFile(_) => "REMOVE_FILE",
            Action::RemoveDirectory(_) => "REMOVE_DIRECTORY",
            Action::RemoveUser(_) => "REMOVE_USER",
            Action::ModifyFile(_) => "MODIFY_FILE",
            Action::MoveFile(_) => "MOVE_FILE",
            Action::ModifyDirectory(_) => "MODIFY_DIRECTORY",
            Action::MoveDirectory(_) => "MOVE_DIRECTORY",
        }
    }
}
