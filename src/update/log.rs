//! Update construction and signature binding.
//!
//! An [`UpdateLog`] is the Draft→Signed state machine for one update: actions
//! accumulate in the draft, [`UpdateLog::signable_digest`] fixes the canonical
//! encoding, and [`UpdateLog::sign`] binds a verified signature. Only a signed
//! log converts into the wire-ready [`SignedUpdate`].

use crate::auth::Verifier;
use crate::error::FsError;
use crate::types::{Address, UpdateId};
use crate::update::Action;
use serde::{Deserialize, Serialize};

/// Canonical signable core of an update. The serialized field order of this
/// struct defines the canonical encoding the digest is computed over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateData {
    pub id: UpdateId,
    pub project_name: String,
    pub actions: Vec<Action>,
    pub actor_address: Address,
}

/// A signed, wire-ready update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUpdate {
    pub id: UpdateId,
    pub project_name: String,
    pub actions: Vec<Action>,
    pub actor_address: Address,
    /// Signature over the canonical digest, lowercase hex
    pub signature: String,
}

/// Builder and validator for one update.
#[derive(Debug, Clone)]
pub struct UpdateLog {
    id: UpdateId,
    project_name: String,
    actor_address: Address,
    actions: Vec<Action>,
    signature: Option<String>,
}

impl UpdateLog {
    /// Start a draft update. The actor address is case-normalized.
    pub fn new(project_name: impl Into<String>, actor_address: &str, id: UpdateId) -> Self {
        Self {
            id,
            project_name: project_name.into(),
            actor_address: actor_address.to_lowercase(),
            actions: Vec::new(),
            signature: None,
        }
    }

    /// Rebuild a log from a received [`SignedUpdate`], e.g. to recompute its
    /// digest for verification.
    pub fn from_signed(signed: &SignedUpdate) -> Self {
        Self {
            id: signed.id,
            project_name: signed.project_name.clone(),
            actor_address: signed.actor_address.to_lowercase(),
            actions: signed.actions.clone(),
            signature: Some(signed.signature.to_lowercase()),
        }
    }

    pub fn id(&self) -> UpdateId {
        self.id
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn actor_address(&self) -> &str {
        &self.actor_address
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Append an action to the draft. Signing fixes the action list; adding
    /// afterwards invalidates the stored signature.
    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
        self.signature = None;
    }

    /// Replace the draft's actions wholesale.
    pub fn set_actions(&mut self, actions: Vec<Action>) {
        self.actions = actions;
        self.signature = None;
    }

    /// Digest of the canonical encoding of `{id, projectName, actions,
    /// actorAddress}`, as lowercase hex. Fails on an incomplete draft.
    pub fn signable_digest(&self) -> Result<String, FsError> {
        if self.id == 0 {
            return Err(FsError::IncompleteUpdate("id is required"));
        }
        if self.project_name.is_empty() {
            return Err(FsError::IncompleteUpdate("project name is required"));
        }
        if self.actions.is_empty() {
            return Err(FsError::IncompleteUpdate("at least one action is required"));
        }
        if self.actor_address.is_empty() {
            return Err(FsError::IncompleteUpdate("actor address is required"));
        }

        let data = UpdateData {
            id: self.id,
            project_name: self.project_name.clone(),
            actions: self.actions.clone(),
            actor_address: self.actor_address.clone(),
        };
        let encoded = serde_json::to_string(&data)?;
        Ok(hex::encode(blake3::hash(encoded.as_bytes()).as_bytes()))
    }

    /// Bind a signature to the draft, transitioning to Signed. The signature
    /// must verify over [`Self::signable_digest`] under the actor's address.
    pub fn sign(&mut self, signature: &str, verifier: &dyn Verifier) -> Result<(), FsError> {
        if signature.is_empty() {
            return Err(FsError::MissingSignature);
        }

        let digest = self.signable_digest()?;
        if !verifier.verify(&digest, signature, &self.actor_address) {
            return Err(FsError::BadSignature);
        }

        self.signature = Some(signature.to_lowercase());
        Ok(())
    }

    /// Sign the draft with a raw secret key via the verifier's signer.
    pub fn sign_with_key(
        &mut self,
        secret_key: &[u8],
        verifier: &dyn Verifier,
    ) -> Result<(), FsError> {
        let digest = self.signable_digest()?;
        let signature = verifier.sign(&digest, secret_key)?;
        self.sign(&signature, verifier)
    }

    /// Convert a signed log into its wire form.
    pub fn into_signed(self) -> Result<SignedUpdate, FsError> {
        // completeness first, so an empty draft reports what is missing
        self.signable_digest()?;
        let signature = self.signature.ok_or(FsError::MissingSignature)?;

        Ok(SignedUpdate {
            id: self.id,
            project_name: self.project_name,
            actions: self.actions,
            actor_address: self.actor_address,
            signature,
        })
    }
}
