//! Anchor records.
//!
//! A published snapshot is committed by writing a short record into an
//! external anchor slot (e.g. an on-chain value): `lfs:<index>:<digest>`,
//! where `<index>` is the update index the snapshot was taken at and
//! `<digest>` names its root chunk. The slot is size-constrained, hence the
//! tight bounds here.

use crate::error::FsError;

/// Magic word opening every anchor record.
pub const ANCHOR_MAGIC: &str = "lfs";

/// Bounds for the decimal index part.
pub const MIN_INDEX_LENGTH: usize = 1;
pub const MAX_INDEX_LENGTH: usize = 35;

/// Exact length of the digest part, lowercase hex.
pub const DIGEST_LENGTH: usize = 64;

/// Max length of a whole record: the 126-byte anchor slot minus the
/// 19-byte signing-envelope overhead.
pub const MAX_ANCHOR_RECORD_LENGTH: usize = 107;

/// Parsed anchor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorRecord {
    /// Update index the anchored snapshot was taken at
    pub index: u64,
    /// Root chunk digest of the snapshot, lowercase hex
    pub digest: String,
}

/// Parse and validate an anchor record.
pub fn parse_anchor_record(data: &str) -> Result<AnchorRecord, FsError> {
    const PARTS: usize = 3;

    if data.len() > MAX_ANCHOR_RECORD_LENGTH {
        return Err(FsError::InvalidAnchor(format!(
            "too large record: max length is {MAX_ANCHOR_RECORD_LENGTH}"
        )));
    }

    let parts: Vec<&str> = data.split(':').collect();
    if parts.len() != PARTS {
        return Err(FsError::InvalidAnchor("invalid record format".to_string()));
    }

    if parts[0] != ANCHOR_MAGIC {
        return Err(FsError::InvalidAnchor(format!(
            "incorrect magic word: expected {ANCHOR_MAGIC:?}"
        )));
    }

    let index_part = parts[1];
    if index_part.starts_with('0') {
        return Err(FsError::InvalidAnchor(
            "index must be a number without leading zeros".to_string(),
        ));
    }
    if index_part.len() < MIN_INDEX_LENGTH || index_part.len() > MAX_INDEX_LENGTH {
        return Err(FsError::InvalidAnchor(format!(
            "incorrect index length: expected {MIN_INDEX_LENGTH}-{MAX_INDEX_LENGTH}"
        )));
    }

    let index: i128 = index_part
        .parse()
        .map_err(|_| FsError::InvalidAnchor("index must be a number".to_string()))?;
    if index < 1 {
        return Err(FsError::InvalidAnchor(
            "index must be greater than zero".to_string(),
        ));
    }
    let index = u64::try_from(index)
        .map_err(|_| FsError::InvalidAnchor("index is out of range".to_string()))?;

    let digest = parts[2];
    if digest.len() != DIGEST_LENGTH {
        return Err(FsError::InvalidAnchor(format!(
            "expected digest length is {DIGEST_LENGTH} characters"
        )));
    }
    if !crate::auth::is_hex_lower(digest) {
        return Err(FsError::InvalidAnchor(
            "digest must be a lowercase hexadecimal string".to_string(),
        ));
    }

    Ok(AnchorRecord {
        index,
        digest: digest.to_string(),
    })
}
