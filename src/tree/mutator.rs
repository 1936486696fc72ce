//! Create/remove mutations over the directory tree, scoped to one actor.
//!
//! Every resolvable target lives under the invoking user's own address-named
//! directory: the ancestor walk descends through `[actor, ...intermediate]`,
//! so a user can never touch another user's subtree. Ancestors must already
//! exist; nothing is auto-created.

use crate::error::FsError;
use crate::tree::{path, Directory, File, ItemKind};
use crate::types::UpdateId;
use tracing::debug;

/// Payload for a new tree entry.
#[derive(Debug, Clone, Copy)]
pub enum NewItem<'a> {
    Directory,
    File {
        content_hash: &'a str,
        mime_type: &'a str,
        size: u64,
    },
}

impl NewItem<'_> {
    fn kind(&self) -> ItemKind {
        match self {
            NewItem::Directory => ItemKind::Directory,
            NewItem::File { .. } => ItemKind::File,
        }
    }
}

/// Check that `path` names a creatable entry of `kind` for `actor`.
///
/// Validates syntax, requires at least one segment beyond the root, walks
/// all ancestors (actor address first) requiring each to exist, and rejects
/// a target name already present among same-kind siblings.
pub fn can_create(
    root: &Directory,
    actor: &str,
    new_path: &str,
    kind: ItemKind,
) -> Result<(), FsError> {
    let (name, parts) = target_name(new_path)?;
    path::validate_name(name)?;

    let parent = walk_parent(root, actor, &parts)?;
    if parent.has_child(name, kind) {
        return Err(FsError::AlreadyExists {
            kind,
            name: name.to_string(),
        });
    }

    Ok(())
}

/// Check that `path` names an existing entry of `kind` under `actor`.
pub fn can_remove(
    root: &Directory,
    actor: &str,
    target_path: &str,
    kind: ItemKind,
) -> Result<(), FsError> {
    let (name, parts) = target_name(target_path)?;
    path::validate_name(name)?;

    let parent = walk_parent(root, actor, &parts)?;
    if !parent.has_child(name, kind) {
        return Err(FsError::DoesNotExist {
            kind,
            name: name.to_string(),
        });
    }

    Ok(())
}

/// Create a new entry at `path` for `actor`, stamped with `update_id`.
pub fn create(
    root: &mut Directory,
    actor: &str,
    update_id: UpdateId,
    new_path: &str,
    item: NewItem<'_>,
) -> Result<(), FsError> {
    can_create(root, actor, new_path, item.kind())?;

    let (name, parts) = target_name(new_path)?;
    let parent = walk_parent_mut(root, actor, &parts)?;
    match item {
        NewItem::Directory => {
            parent
                .subdirectories
                .push(Directory::new(name, actor, update_id));
        }
        NewItem::File {
            content_hash,
            mime_type,
            size,
        } => {
            parent.files.push(File {
                name: name.to_string(),
                content_hash: content_hash.to_string(),
                mime_type: mime_type.to_string(),
                size,
                created_at_update_id: update_id,
            });
        }
    }
    debug!(actor, path = new_path, kind = %item.kind(), "created tree entry");

    Ok(())
}

/// Remove the entry of `kind` at `path` for `actor`. For directories the
/// entire subtree is discarded as one unit; descendants are not inspected.
pub fn remove(
    root: &mut Directory,
    actor: &str,
    target_path: &str,
    kind: ItemKind,
) -> Result<(), FsError> {
    can_remove(root, actor, target_path, kind)?;

    let (name, parts) = target_name(target_path)?;
    let parent = walk_parent_mut(root, actor, &parts)?;
    match kind {
        ItemKind::Directory => {
            let index = parent
                .subdirectories
                .iter()
                .position(|d| d.name == name)
                .ok_or_else(|| FsError::DoesNotExist {
                    kind,
                    name: name.to_string(),
                })?;
            parent.subdirectories.remove(index);
        }
        ItemKind::File => {
            let index = parent
                .files
                .iter()
                .position(|f| f.name == name)
                .ok_or_else(|| FsError::DoesNotExist {
                    kind,
                    name: name.to_string(),
                })?;
            parent.files.remove(index);
        }
    }
    debug!(actor, path = target_path, kind = %kind, "removed tree entry");

    Ok(())
}

/// Split a path into its final segment and the full segment list. The root
/// itself is never a valid target.
fn target_name(target_path: &str) -> Result<(&str, Vec<&str>), FsError> {
    let parts = path::split_path(target_path)?;
    if parts.len() <= 1 {
        return Err(FsError::PathWithoutComponents);
    }
    Ok((parts[parts.len() - 1], parts))
}

fn walk_parent<'a>(
    root: &'a Directory,
    actor: &str,
    parts: &[&str],
) -> Result<&'a Directory, FsError> {
    let mut current = root;
    for segment in ancestors(actor, parts) {
        current = current
            .subdirectory(segment)
            .ok_or_else(|| FsError::ParentNotFound(segment.to_string()))?;
    }
    Ok(current)
}

fn walk_parent_mut<'a>(
    root: &'a mut Directory,
    actor: &str,
    parts: &[&str],
) -> Result<&'a mut Directory, FsError> {
    let mut current = root;
    for segment in ancestors(actor, parts) {
        current = current
            .subdirectory_mut(segment)
            .ok_or_else(|| FsError::ParentNotFound(segment.to_string()))?;
    }
    Ok(current)
}

/// Ancestor segments of a target: the actor's root directory, then every
/// intermediate path segment (the final segment is the target itself).
fn ancestors<'a>(actor: &'a str, parts: &'a [&'a str]) -> impl Iterator<Item = &'a str> {
    std::iter::once(actor).chain(parts[1..parts.len() - 1].iter().copied())
}
