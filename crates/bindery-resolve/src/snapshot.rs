use std::sync::Arc;

use bindery_config::ResolutionConfig;
use bindery_types::TypeSystem;
use serde::{Deserialize, Serialize};

use crate::{Candidate, CandidateRegistry, SnapshotError};

/// A persisted candidate pool with precomputed type closures.
///
/// Restoring a snapshot skips closure computation; memo maps start empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub version: u32,
    pub candidates: Vec<Candidate>,
}

impl RegistrySnapshot {
    pub const VERSION: u32 = 1;

    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            version: Self::VERSION,
            candidates,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode and validate a snapshot.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        let snapshot: RegistrySnapshot = serde_json::from_str(text)?;
        if snapshot.version != Self::VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: Self::VERSION,
            });
        }
        for candidate in &snapshot.candidates {
            candidate.validate()?;
        }
        Ok(snapshot)
    }
}

impl CandidateRegistry {
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::new(
            self.candidates()
                .iter()
                .map(|candidate| candidate.as_ref().clone())
                .collect(),
        )
    }

    pub fn from_snapshot(
        types: Arc<dyn TypeSystem>,
        snapshot: RegistrySnapshot,
        config: &ResolutionConfig,
    ) -> Self {
        Self::with_config(types, snapshot.candidates, config)
    }
}
