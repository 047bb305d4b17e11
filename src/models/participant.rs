//! Participant, ParticipantStatus and SeededParticipant.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for a participant (player or team). Used in matches and lookups.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh UUID-backed id, for callers that don't bring their own.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<Uuid> for ParticipantId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

/// Registration status. Withdrawn participants are left out of bracket generation.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    #[default]
    Registered,
    CheckedIn,
    Withdrawn,
}

impl ParticipantStatus {
    pub fn is_eligible(self) -> bool {
        matches!(self, ParticipantStatus::Registered | ParticipantStatus::CheckedIn)
    }
}

/// A registered entrant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    /// Seed hint for manual seeding (positive, unique within a tournament).
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub status: ParticipantStatus,
}

impl Participant {
    /// Registered participant without a seed hint.
    pub fn new(id: impl Into<ParticipantId>) -> Self {
        Self {
            id: id.into(),
            seed: None,
            status: ParticipantStatus::Registered,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_status(mut self, status: ParticipantStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_eligible(&self) -> bool {
        self.status.is_eligible()
    }
}

/// A participant with its final, dense seed (1..=N).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeededParticipant {
    pub id: ParticipantId,
    pub seed: u32,
}
