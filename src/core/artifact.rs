//! Accepted stage output.
//!
//! An `Artifact` is only ever constructed by the orchestrator after a
//! candidate has passed every check, and it exposes no mutators.

use crate::core::types::StageId;
use semver::Version;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an accepted artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactId(pub Uuid);

impl ArtifactId {
    /// Create a new random artifact ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Immutable, versioned record produced by one pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact<T> {
    id: ArtifactId,
    stage: StageId,
    schema_version: Version,
    /// Attempt number (1-based) that produced this artifact.
    attempt: u32,
    payload: T,
}

impl<T> Artifact<T> {
    pub(crate) fn new(stage: StageId, schema_version: Version, attempt: u32, payload: T) -> Self {
        Self {
            id: ArtifactId::new(),
            stage,
            schema_version,
            attempt,
            payload,
        }
    }

    pub fn id(&self) -> ArtifactId {
        self.id
    }

    pub fn stage(&self) -> StageId {
        self.stage
    }

    pub fn schema_version(&self) -> &Version {
        &self.schema_version
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Consume the envelope and keep the payload.
    pub fn into_payload(self) -> T {
        self.payload
    }

    /// Transform the payload while keeping identity and version.
    pub(crate) fn map<U>(self, f: impl FnOnce(T) -> U) -> Artifact<U> {
        Artifact {
            id: self.id,
            stage: self.stage,
            schema_version: self.schema_version,
            attempt: self.attempt,
            payload: f(self.payload),
        }
    }
}
