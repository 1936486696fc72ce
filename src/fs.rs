//! The file-system engine.
//!
//! Owns the tree, the user registry, the per-user update histories, and the
//! per-user sequence counters, and applies signed updates to them under the
//! sequencing and authentication rules. The engine is a single-writer state
//! machine: callers serialize `apply_update` externally; it is synchronous
//! and performs no I/O.

use crate::auth::{self, Verifier, SIGNATURE_SCHEME_V1};
use crate::config::FileSystemOptions;
use crate::error::FsError;
use crate::tree::mutator::{self, NewItem};
use crate::tree::path::{self, Entry};
use crate::tree::{Directory, ItemKind, Tree};
use crate::types::{Address, UpdateId, User};
use crate::update::action::AddUserAction;
use crate::update::{Action, SignedUpdate, UpdateLog, MAX_ACTIONS_PER_UPDATE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Which sections a [`FileSystem::snapshot`] includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotOptions {
    pub with_updates: bool,
    pub with_users: bool,
    pub with_user_update_map: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            with_updates: true,
            with_users: true,
            with_user_update_map: true,
        }
    }
}

/// Deep-cloned engine state, as exported by [`FileSystem::snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMeta {
    pub version: String,
    pub project_name: String,
    pub project_description: String,
    pub tree: Tree,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updates: Option<HashMap<Address, Vec<SignedUpdate>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_update_map: Option<HashMap<Address, UpdateId>>,
}

/// The engine: materialized state of one project's update log.
pub struct FileSystem {
    options: FileSystemOptions,
    verifier: Arc<dyn Verifier>,
    tree: Tree,
    users: Vec<User>,
    updates: HashMap<Address, Vec<SignedUpdate>>,
    user_update_map: HashMap<Address, UpdateId>,
}

impl FileSystem {
    /// Create an empty engine for the configured project.
    pub fn new(options: FileSystemOptions, verifier: Arc<dyn Verifier>) -> Self {
        Self {
            options,
            verifier,
            tree: Tree::new(),
            users: Vec::new(),
            updates: HashMap::new(),
            user_update_map: HashMap::new(),
        }
    }

    pub fn options(&self) -> &FileSystemOptions {
        &self.options
    }

    /// Whether `address` is a registered user.
    pub fn is_user_registered(&self, address: &str) -> bool {
        let address = address.to_lowercase();
        self.users.iter().any(|user| user.address == address)
    }

    /// Last applied update id for `address`; 0 if none.
    pub fn current_sequence(&self, address: &str) -> UpdateId {
        self.user_update_map
            .get(&address.to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Resolve a fully-qualified path (first segment: user address) against
    /// the live tree.
    pub fn resolve(&self, target: &str) -> Result<Entry<'_>, FsError> {
        path::resolve(target, &self.tree.directory)
    }

    /// Validate and apply one signed update.
    ///
    /// The validation pipeline runs in order, each step a hard precondition;
    /// the tree is untouched until all of them pass. Actions then apply in
    /// order, each validating its own structural preconditions before
    /// mutating; on the first action failure the update is abandoned — it is
    /// not recorded and the actor's sequence does not advance.
    pub fn apply_update(&mut self, signed: &SignedUpdate) -> Result<(), FsError> {
        if self.options.authentication_scheme != SIGNATURE_SCHEME_V1 {
            return Err(FsError::UnsupportedScheme(
                self.options.authentication_scheme.clone(),
            ));
        }

        let count = signed.actions.len();
        if count == 0 || count > MAX_ACTIONS_PER_UPDATE {
            return Err(FsError::ActionCountInvalid(count));
        }

        if signed.project_name != self.options.project_name {
            return Err(FsError::ProjectMismatch {
                expected: self.options.project_name.clone(),
                got: signed.project_name.clone(),
            });
        }

        if signed.id == 0 {
            return Err(FsError::InvalidUpdateId);
        }

        let actor = signed.actor_address.to_lowercase();
        let last = self.current_sequence(&actor);
        if signed.id <= last {
            return Err(FsError::DuplicateUpdate { id: signed.id });
        }
        if signed.id != last + 1 {
            return Err(FsError::SequenceGap {
                expected: last + 1,
                got: signed.id,
            });
        }

        if signed.signature.is_empty() {
            return Err(FsError::MissingSignature);
        }
        let digest = UpdateLog::from_signed(signed).signable_digest()?;
        if !self
            .verifier
            .verify(&digest, &signed.signature, &actor)
        {
            return Err(FsError::BadSignature);
        }

        for action in &signed.actions {
            self.handle_action(&actor, signed.id, action)?;
        }

        self.updates
            .entry(actor.clone())
            .or_default()
            .push(signed.clone());
        self.user_update_map.insert(actor.clone(), signed.id);
        debug!(actor = %actor, id = signed.id, actions = count, "applied update");

        Ok(())
    }

    /// Export a deep clone of the engine state.
    pub fn snapshot(&self, options: &SnapshotOptions) -> ExportMeta {
        ExportMeta {
            version: self.options.version.clone(),
            project_name: self.options.project_name.clone(),
            project_description: self.options.project_description.clone(),
            tree: self.tree.clone(),
            updates: options.with_updates.then(|| self.updates.clone()),
            users: options.with_users.then(|| self.users.clone()),
            user_update_map: options
                .with_user_update_map
                .then(|| self.user_update_map.clone()),
        }
    }

    /// Swap in fully reconstructed state. Called by the snapshot codec only
    /// after every chunk of an import has been fetched and validated.
    pub(crate) fn restore(
        &mut self,
        tree: Tree,
        users: Vec<User>,
        updates: HashMap<Address, Vec<SignedUpdate>>,
        user_update_map: HashMap<Address, UpdateId>,
    ) {
        self.tree = tree;
        self.users = users;
        self.updates = updates;
        self.user_update_map = user_update_map;
    }

    /// Dispatch one action. Registration is checked against live state, so a
    /// user registered earlier in the same update is already visible here.
    fn handle_action(
        &mut self,
        actor: &str,
        update_id: UpdateId,
        action: &Action,
    ) -> Result<(), FsError> {
        if !matches!(action, Action::AddUser(_)) && !self.is_user_registered(actor) {
            return Err(FsError::UnregisteredActor(actor.to_string()));
        }

        match action {
            Action::AddUser(data) => self.add_user(actor, update_id, data),
            Action::AddDirectory(data) => mutator::create(
                &mut self.tree.directory,
                actor,
                update_id,
                &data.path,
                NewItem::Directory,
            ),
            Action::AddFile(data) => mutator::create(
                &mut self.tree.directory,
                actor,
                update_id,
                &data.path,
                NewItem::File {
                    content_hash: &data.content_hash,
                    mime_type: &data.mime_type,
                    size: data.size,
                },
            ),
            Action::RemoveDirectory(data) => mutator::remove(
                &mut self.tree.directory,
                actor,
                &data.path,
                ItemKind::Directory,
            ),
            Action::RemoveFile(data) => mutator::remove(
                &mut self.tree.directory,
                actor,
                &data.path,
                ItemKind::File,
            ),
            other => Err(FsError::ActionNotImplemented(other.kind())),
        }
    }

    /// Register a user and create their address-named root directory.
    fn add_user(
        &mut self,
        actor: &str,
        update_id: UpdateId,
        data: &AddUserAction,
    ) -> Result<(), FsError> {
        let address = data.user_address.to_lowercase();

        if actor != address {
            return Err(FsError::ActorMismatch {
                actor: actor.to_string(),
                target: address,
            });
        }
        if !auth::is_valid_address(&address) {
            return Err(FsError::InvalidAddress(address));
        }
        if self.users.iter().any(|user| user.address == address) {
            return Err(FsError::UserExists(address));
        }
        if self.tree.directory.subdirectory(&address).is_some() {
            return Err(FsError::UserDirectoryExists(address));
        }

        self.users.push(User {
            address: address.clone(),
        });
        self.tree
            .directory
            .subdirectories
            .push(Directory::new(&address, &address, update_id));
        info!(address = %address, "registered user");

        Ok(())
    }
}
