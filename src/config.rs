//! Engine configuration.
//!
//! Options are plain data supplied at construction. [`FileSystemOptions::load`]
//! layers an optional config file under `LEDGERFS_`-prefixed environment
//! variables for embedders that configure from the outside.

use crate::auth::SIGNATURE_SCHEME_V1;
use crate::error::FsError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Construction options for a [`crate::fs::FileSystem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemOptions {
    /// Version of the file-system format
    pub version: String,

    /// Name of the project; every update must carry it
    pub project_name: String,

    /// Free-form project description, carried into snapshots
    pub project_description: String,

    /// Authentication scheme for update signatures
    #[serde(default = "default_scheme")]
    pub authentication_scheme: String,
}

fn default_scheme() -> String {
    SIGNATURE_SCHEME_V1.to_string()
}

impl FileSystemOptions {
    /// Options with the default authentication scheme.
    pub fn new(
        version: impl Into<String>,
        project_name: impl Into<String>,
        project_description: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            project_name: project_name.into(),
            project_description: project_description.into(),
            authentication_scheme: default_scheme(),
        }
    }

    /// Load options from an optional config file, overridden by
    /// `LEDGERFS_`-prefixed environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, FsError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path));
        }
        builder = builder.add_source(config::Environment::with_prefix("LEDGERFS"));

        let settings = builder
            .build()
            .map_err(|e| FsError::Config(e.to_string()))?;
        settings
            .try_deserialize()
            .map_err(|e| FsError::Config(e.to_string()))
    }
}
