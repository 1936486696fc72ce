//! Shared helpers for integration tests.
#![allow(dead_code)]

use ledgerfs::auth::{personal_message_bytes, Verifier};
use ledgerfs::config::FileSystemOptions;
use ledgerfs::error::FsError;
use ledgerfs::fs::FileSystem;
use ledgerfs::update::{Action, SignedUpdate, UpdateLog};
use std::sync::Arc;

pub const PROJECT_NAME: &str = "Test";
pub const PROJECT_DESCRIPTION: &str = "The most amazing project in the world";
pub const FS_VERSION: &str = "0.0.1";

/// Deterministic stand-in for the external public-key signature scheme.
///
/// A wallet's "secret key" is the raw bytes of its own address, and a
/// signature is the keyed hash of the personal message under that key, so
/// verification needs nothing but the address. Good enough to exercise every
/// signature-dependent code path without real asymmetric crypto.
pub struct KeyedHashVerifier;

impl KeyedHashVerifier {
    fn signature_for(secret_key: &[u8], digest: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(secret_key);
        hasher.update(&personal_message_bytes(digest));
        hex::encode(hasher.finalize().as_bytes())
    }
}

impl Verifier for KeyedHashVerifier {
    fn verify(&self, digest: &str, signature: &str, address: &str) -> bool {
        Self::signature_for(address.as_bytes(), digest) == signature.to_lowercase()
    }

    fn sign(&self, digest: &str, secret_key: &[u8]) -> Result<String, FsError> {
        Ok(Self::signature_for(secret_key, digest))
    }
}

/// A test identity: address derived from a seed, secret key matching the
/// [`KeyedHashVerifier`] convention.
pub struct TestWallet {
    pub address: String,
}

impl TestWallet {
    pub fn new(seed: u8) -> Self {
        Self {
            address: hex::encode(blake3::hash(&[seed]).as_bytes()),
        }
    }

    pub fn secret_key(&self) -> &[u8] {
        self.address.as_bytes()
    }

    pub fn sign(&self, digest: &str) -> String {
        KeyedHashVerifier::signature_for(self.secret_key(), digest)
    }
}

/// Fresh engine for the shared test project.
pub fn new_engine() -> FileSystem {
    new_engine_with_scheme("signature-v1")
}

pub fn new_engine_with_scheme(scheme: &str) -> FileSystem {
    FileSystem::new(
        FileSystemOptions {
            version: FS_VERSION.to_string(),
            project_name: PROJECT_NAME.to_string(),
            project_description: PROJECT_DESCRIPTION.to_string(),
            authentication_scheme: scheme.to_string(),
        },
        Arc::new(KeyedHashVerifier),
    )
}

/// Build and sign an update for the shared test project.
pub fn signed_update(wallet: &TestWallet, id: u64, actions: Vec<Action>) -> SignedUpdate {
    let mut log = UpdateLog::new(PROJECT_NAME, &wallet.address, id);
    log.set_actions(actions);
    log.sign_with_key(wallet.secret_key(), &KeyedHashVerifier)
        .expect("signing a complete draft");
    log.into_signed().expect("signed update")
}

/// Register a wallet as update id 1.
pub fn register(fs: &mut FileSystem, wallet: &TestWallet) {
    let update = signed_update(wallet, 1, vec![Action::add_user(wallet.address.as_str())]);
    fs.apply_update(&update).expect("registration update");
}

/// Deterministic fake content reference, uppercase hex like real bag ids.
pub fn fake_content_hash(seed: u8) -> String {
    hex::encode(blake3::hash(&[0xc0, seed]).as_bytes()).to_uppercase()
}
