//! Path validation and resolution.
//!
//! Pure functions over absolute paths and a directory tree; no mutation.
//! Paths use `/` as separator, names are restricted to `[A-Za-z0-9-]`.

use crate::error::FsError;
use crate::tree::{Directory, File};

/// Name of the root directory.
pub const ROOT: &str = "/";

/// Max length of a path in characters.
pub const MAX_PATH_LENGTH: usize = 1000;

/// Max length of a single name in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Entry addressed by a resolved path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entry<'a> {
    Directory(&'a Directory),
    File(&'a File),
}

impl<'a> Entry<'a> {
    /// The entry's name.
    pub fn name(&self) -> &str {
        match self {
            Entry::Directory(d) => &d.name,
            Entry::File(f) => &f.name,
        }
    }

    pub fn as_directory(&self) -> Option<&'a Directory> {
        match self {
            Entry::Directory(d) => Some(d),
            Entry::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&'a File> {
        match self {
            Entry::File(f) => Some(f),
            Entry::Directory(_) => None,
        }
    }
}

/// Whether `path` is syntactically acceptable: non-empty, bounded length,
/// `[A-Za-z0-9-/]` charset, and no consecutive separators.
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || path.len() > MAX_PATH_LENGTH {
        return false;
    }
    if !path
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'/')
    {
        return false;
    }
    !path.contains("//")
}

/// Whether `name` is a valid entry name: 1..=255 chars of `[A-Za-z0-9-]`.
pub fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAME_LENGTH {
        return false;
    }
    name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

/// Validate path syntax, including the leading separator.
pub fn validate_path(path: &str) -> Result<(), FsError> {
    if !is_valid_path(path) || !path.starts_with(ROOT) {
        return Err(FsError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// Validate an entry name.
pub fn validate_name(name: &str) -> Result<(), FsError> {
    if !is_valid_name(name) {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Split a validated absolute path into segments: `["/"]` for the root,
/// otherwise `["/", seg1, seg2, ...]`.
pub fn split_path(path: &str) -> Result<Vec<&str>, FsError> {
    validate_path(path)?;

    if path == ROOT {
        return Ok(vec![ROOT]);
    }

    let mut parts = vec![ROOT];
    parts.extend(path[1..].split('/'));
    Ok(parts)
}

/// Resolve an absolute path against `root` and return the addressed entry.
///
/// Walks the literal segments: at each level a subdirectory match descends;
/// a file match is accepted only in final position. A missing segment fails
/// with `NotFound`.
pub fn resolve<'a>(path: &str, root: &'a Directory) -> Result<Entry<'a>, FsError> {
    debug_assert_eq!(root.name, ROOT);
    let parts = split_path(path)?;

    let mut current = root;
    let segments = &parts[1..];
    for (i, segment) in segments.iter().enumerate() {
        if let Some(found) = current.subdirectory(segment) {
            current = found;
        } else if i + 1 == segments.len() {
            return current
                .file(segment)
                .map(Entry::File)
                .ok_or_else(|| FsError::NotFound(segment.to_string()));
        } else {
            return Err(FsError::NotFound(segment.to_string()));
        }
    }

    Ok(Entry::Directory(current))
}
