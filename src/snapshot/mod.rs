//! Snapshot codec.
//!
//! Flattens an engine's full state into a rooted DAG of content-addressed
//! chunks and rebuilds it exactly. Export walks the state top-down and
//! uploads chunks bottom-up, ending in a single root reference; import
//! dereferences one level before descending and only swaps the rebuilt state
//! into the engine once every chunk has been fetched and validated.
//!
//! Chunk payloads are JSON. Map-shaped chunks serialize from ordered maps so
//! a given state always produces byte-identical chunks (and, over a
//! content-addressed store, the same root reference).

use crate::error::FsError;
use crate::fs::{FileSystem, SnapshotOptions};
use crate::store::{ChunkRef, ChunkStore};
use crate::tree::{Directory, File, Tree};
use crate::types::{Address, UpdateId, User};
use crate::update::SignedUpdate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Which sections an import rebuilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Fetch per-user update histories (the tree, users, and sequence
    /// counters are always rebuilt)
    pub with_updates: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { with_updates: true }
    }
}

/// Root chunk of an exported snapshot: project identity plus one reference
/// per top-level section.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackedMeta {
    version: String,
    project_name: String,
    project_description: String,
    tree: ChunkRef,
    updates: ChunkRef,
    users: ChunkRef,
    user_update_map: ChunkRef,
}

/// Tree chunk: the root directory with its child lists compressed into
/// references.
#[derive(Debug, Serialize, Deserialize)]
struct PackedTree {
    directory: PackedRootDirectory,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackedRootDirectory {
    name: String,
    files: ChunkRef,
    subdirectories: ChunkRef,
    owner_address: String,
    created_at_update_id: UpdateId,
}

/// Codec over a borrowed chunk store.
pub struct SnapshotCodec<'a, S: ChunkStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ChunkStore + ?Sized> SnapshotCodec<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Export the engine's full state, returning the root reference.
    ///
    /// Read-only on the engine: the chunks are built from a snapshot clone.
    /// For N registered users of whom M have recorded updates this issues
    /// N + M + 7 store writes.
    pub async fn export(&self, fs: &FileSystem) -> Result<ChunkRef, FsError> {
        let meta = fs.snapshot(&SnapshotOptions::default());
        let users = meta.users.unwrap_or_default();
        let updates = meta.updates.unwrap_or_default();
        let user_update_map = meta.user_update_map.unwrap_or_default();
        let root = &meta.tree.directory;

        let mut directory_refs: BTreeMap<Address, ChunkRef> = BTreeMap::new();
        let mut update_refs: BTreeMap<Address, ChunkRef> = BTreeMap::new();
        for user in &users {
            // every registered user owns a root-level directory
            let directory = root
                .subdirectory(&user.address)
                .ok_or_else(|| FsError::UserDirectoryMissing(user.address.clone()))?;
            let reference = self.put_json(directory).await?;
            directory_refs.insert(user.address.clone(), reference);

            // update history is optional per user
            if let Some(user_updates) = updates.get(&user.address) {
                let reference = self.put_json(user_updates).await?;
                update_refs.insert(user.address.clone(), reference);
            }
        }

        let directories_ref = self.put_json(&directory_refs).await?;
        let root_files_ref = self.put_json(&root.files).await?;
        let tree_ref = self
            .put_json(&PackedTree {
                directory: PackedRootDirectory {
                    name: root.name.clone(),
                    files: root_files_ref,
                    subdirectories: directories_ref,
                    owner_address: root.owner_address.clone(),
                    created_at_update_id: root.created_at_update_id,
                },
            })
            .await?;
        let updates_ref = self.put_json(&update_refs).await?;
        let users_ref = self.put_json(&users).await?;
        let user_update_map_ref = self
            .put_json(&user_update_map.into_iter().collect::<BTreeMap<_, _>>())
            .await?;

        let root_ref = self
            .put_json(&PackedMeta {
                version: meta.version,
                project_name: meta.project_name,
                project_description: meta.project_description,
                tree: tree_ref,
                updates: updates_ref,
                users: users_ref,
                user_update_map: user_update_map_ref,
            })
            .await?;
        debug!(users = users.len(), root = %root_ref.reference, "exported snapshot");

        Ok(root_ref)
    }

    /// Import a snapshot by its root reference into `fs`.
    ///
    /// Fetches top-down, validates every payload's shape, and rebuilds the
    /// state bottom-up; `fs` is only touched after the whole snapshot has
    /// been reconstructed.
    pub async fn import(
        &self,
        reference: &ChunkRef,
        options: &ImportOptions,
        fs: &mut FileSystem,
    ) -> Result<(), FsError> {
        let meta: PackedMeta = self.get_json(reference).await?;

        let users: Vec<User> = self.get_json(&meta.users).await?;
        for user in &users {
            if user.address.is_empty() {
                return Err(FsError::CorruptSnapshot(
                    "user with empty address".to_string(),
                ));
            }
        }

        let user_update_map: HashMap<Address, UpdateId> =
            self.get_json(&meta.user_update_map).await?;

        let mut updates: HashMap<Address, Vec<SignedUpdate>> = HashMap::new();
        if options.with_updates {
            let update_refs: BTreeMap<Address, ChunkRef> = self.get_json(&meta.updates).await?;
            for user in &users {
                // users without recorded updates are omitted from the map
                if let Some(reference) = update_refs.get(&user.address) {
                    let history: Vec<SignedUpdate> = self.get_json(reference).await?;
                    updates.insert(user.address.clone(), history);
                }
            }
        }

        let packed_tree: PackedTree = self.get_json(&meta.tree).await?;
        if packed_tree.directory.name != "/" {
            return Err(FsError::CorruptSnapshot(format!(
                "root directory must be named \"/\", got {:?}",
                packed_tree.directory.name
            )));
        }

        let directory_refs: BTreeMap<Address, ChunkRef> =
            self.get_json(&packed_tree.directory.subdirectories).await?;
        // rebuild in users-list order, which is the order export saw them in
        let mut subdirectories = Vec::with_capacity(users.len());
        for user in &users {
            let reference = directory_refs.get(&user.address).ok_or_else(|| {
                FsError::CorruptSnapshot(format!(
                    "directory chunk for user {:?} missing",
                    user.address
                ))
            })?;
            let directory: Directory = self.get_json(reference).await?;
            subdirectories.push(directory);
        }

        let files: Vec<File> = self.get_json(&packed_tree.directory.files).await?;

        let tree = Tree {
            directory: Directory {
                name: packed_tree.directory.name,
                files,
                subdirectories,
                owner_address: packed_tree.directory.owner_address,
                created_at_update_id: packed_tree.directory.created_at_update_id,
            },
        };

        debug!(users = users.len(), root = %reference.reference, "imported snapshot");
        fs.restore(tree, users, updates, user_update_map);

        Ok(())
    }

    async fn put_json<T: Serialize>(&self, value: &T) -> Result<ChunkRef, FsError> {
        let payload = serde_json::to_string(value)?;
        Ok(self.store.put(payload).await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, reference: &ChunkRef) -> Result<T, FsError> {
        let payload = self.store.get(reference).await?;
        serde_json::from_str(&payload).map_err(|e| {
            FsError::CorruptSnapshot(format!("chunk {:?}: {e}", reference.reference))
        })
    }
}
