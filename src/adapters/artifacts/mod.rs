//! Fitted artifact loading.
//!
//! A deployment directory holds JSON exports of the fitted imputer, scaler
//! and classifiers, described by `manifest.json`:
//!
//! ```json
//! {
//!   "version": 1,
//!   "columns": ["age", "sysBP", ...],
//!   "placeholder_columns": [],
//!   "imputer": "imputer.json",
//!   "scaler": "scaler.json",
//!   "models": [{ "name": "HeartDiseaseModel", "file": "model.json" }],
//!   "holdout": "x_test.json",
//!   "files": { "model.json": "<sha256 hex>", ... }
//! }
//! ```
//!
//! When `files` is present every listed file is hashed and compared
//! before anything is parsed.

mod model;
mod preprocess;

pub use model::{LinearKind, LinearModel};
pub use preprocess::{FittedPreprocessor, Scaler, SimpleImputer};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::holdout::HoldoutTable;
use crate::domain::FEATURE_COUNT;

/// Only manifest layout understood by this build.
pub const MANIFEST_VERSION: u32 = 1;

/// Errors raised while loading fitted artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {path:?}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported manifest version: {0}")]
    UnsupportedVersion(u32),

    #[error("Shape mismatch: {0}")]
    Shape(String),

    #[error("Artifact not fitted: {0}")]
    Unfitted(String),

    #[error("Fingerprint mismatch for {file}: expected {expected}, got {actual}")]
    FingerprintMismatch {
        file: String,
        expected: String,
        actual: String,
    },
}

/// One classifier listed in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Display name, used as the key of the per-model label map.
    pub name: String,
    pub file: String,
}

/// Deployment description, see the module docs for the layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub columns: Vec<String>,
    #[serde(default)]
    pub placeholder_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imputer: Option<String>,
    pub scaler: String,
    pub models: Vec<ModelEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holdout: Option<String>,
    /// File name to SHA-256 hex digest.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    pub const FILE_NAME: &'static str = "manifest.json";

    /// Read `manifest.json` from a deployment directory.
    ///
    /// # Errors
    /// Returns error if the manifest is unreadable or malformed.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        read_json(&dir.join(Self::FILE_NAME))
    }

    /// Every artifact file the manifest points at, in load order.
    #[must_use]
    pub fn referenced_files(&self) -> Vec<&str> {
        let mut files = Vec::new();
        files.extend(self.imputer.as_deref());
        files.push(self.scaler.as_str());
        files.extend(self.models.iter().map(|m| m.file.as_str()));
        files.extend(self.holdout.as_deref());
        files.dedup();
        files
    }
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&content).map_err(|source| ArtifactError::Format {
        path: path.to_path_buf(),
        source,
    })
}

/// SHA-256 of a file, lowercase hex.
///
/// # Errors
/// Returns error if the file cannot be read.
pub fn sha256_file(path: &Path) -> Result<String, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

/// First 12 hex digits, enough to tell deployments apart in logs.
#[must_use]
pub fn short_fingerprint(hex: &str) -> &str {
    hex.get(..12).unwrap_or(hex)
}

/// Everything loaded from one deployment directory.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub preprocessor: FittedPreprocessor,
    /// Classifiers in manifest order; the first is the primary model.
    pub models: Vec<(String, LinearModel)>,
    pub holdout: Option<HoldoutTable>,
    /// Fingerprint of every referenced file, whether or not it was verified.
    pub fingerprints: BTreeMap<String, String>,
}

impl ArtifactBundle {
    /// Load and validate every artifact in `dir`.
    ///
    /// With `verify_fingerprints`, files listed in the manifest's `files`
    /// map must hash to the recorded digest.
    ///
    /// # Errors
    /// Returns error if any artifact is missing, malformed, tampered with,
    /// or inconsistent in shape with the others.
    pub fn load(dir: &Path, verify_fingerprints: bool) -> Result<Self, ArtifactError> {
        let manifest = ArtifactManifest::load(dir)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ArtifactError::UnsupportedVersion(manifest.version));
        }
        if manifest.models.is_empty() {
            return Err(ArtifactError::Unfitted("manifest lists no models".into()));
        }

        let mut fingerprints = BTreeMap::new();
        for file in manifest.referenced_files() {
            let actual = sha256_file(&dir.join(file))?;
            if verify_fingerprints {
                if let Some(expected) = manifest.files.get(file) {
                    if !expected.eq_ignore_ascii_case(&actual) {
                        return Err(ArtifactError::FingerprintMismatch {
                            file: file.to_string(),
                            expected: expected.clone(),
                            actual,
                        });
                    }
                } else if !manifest.files.is_empty() {
                    tracing::warn!("{} is not fingerprinted in the manifest", file);
                }
            }
            tracing::info!("Artifact {} sha256:{}", file, short_fingerprint(&actual));
            fingerprints.insert(file.to_string(), actual);
        }
        if !verify_fingerprints {
            tracing::warn!("Artifact fingerprint verification disabled");
        }

        let imputer = manifest
            .imputer
            .as_deref()
            .map(|f| read_json::<SimpleImputer>(&dir.join(f)))
            .transpose()?;
        let scaler: Scaler = read_json(&dir.join(&manifest.scaler))?;
        let preprocessor = FittedPreprocessor::new(
            manifest.columns.clone(),
            manifest.placeholder_columns.len(),
            imputer,
            scaler,
        )?;

        let mut models = Vec::with_capacity(manifest.models.len());
        for entry in &manifest.models {
            let model: LinearModel = read_json(&dir.join(&entry.file))?;
            model.validate(FEATURE_COUNT)?;
            tracing::debug!("Loaded model {} ({:?})", entry.name, model.kind);
            models.push((entry.name.clone(), model));
        }

        let holdout = manifest
            .holdout
            .as_deref()
            .map(|f| HoldoutTable::load(&dir.join(f)))
            .transpose()?;

        tracing::info!(
            "Loaded {} model(s) from {:?} (imputer: {}, holdout rows: {})",
            models.len(),
            dir,
            preprocessor.has_imputer(),
            holdout.as_ref().map_or(0, HoldoutTable::len)
        );

        Ok(Self {
            preprocessor,
            models,
            holdout,
            fingerprints,
        })
    }
}
