//! Authentication boundary.
//!
//! The asymmetric signature scheme itself lives outside this crate, behind
//! the [`Verifier`] trait. This module fixes what the core does depend on:
//! the scheme identifier, the address form, and the domain-separated
//! personal-message framing external signers operate on.

pub mod anchor;

use crate::error::FsError;
use crate::types::ADDRESS_LENGTH;

/// The one authentication scheme the engine currently understands.
pub const SIGNATURE_SCHEME_V1: &str = "signature-v1";

/// Domain-separation magic word for personal-message signing.
pub const SAFE_SIGN_MAGIC: &str = "lfs-safe-sign-magic";

/// Signature verification and production, delegated to an external scheme.
pub trait Verifier: Send + Sync {
    /// Check `signature` over `digest` for the given address (public key).
    fn verify(&self, digest: &str, signature: &str, address: &str) -> bool;

    /// Produce a signature over `digest` with a raw secret key.
    fn sign(&self, digest: &str, secret_key: &[u8]) -> Result<String, FsError>;
}

/// Whether `data` is a non-empty lowercase hex string.
pub fn is_hex_lower(data: &str) -> bool {
    !data.is_empty()
        && data
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Whether `address` has the fixed-length lowercase-hex address form.
pub fn is_valid_address(address: &str) -> bool {
    address.len() == ADDRESS_LENGTH && is_hex_lower(address)
}

/// Build the domain-separated message an external signer actually signs:
/// two `0xff` prefix bytes, the magic word, then the hash of the payload.
pub fn personal_message_bytes(payload: &str) -> Vec<u8> {
    let payload_hash = blake3::hash(payload.as_bytes());

    let mut message = Vec::with_capacity(2 + SAFE_SIGN_MAGIC.len() + payload_hash.as_bytes().len());
    message.extend_from_slice(&[0xff, 0xff]);
    message.extend_from_slice(SAFE_SIGN_MAGIC.as_bytes());
    message.extend_from_slice(payload_hash.as_bytes());
    message
}
