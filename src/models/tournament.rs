//! Tournament aggregate and the engine's error types.

use crate::models::bracket::{Bracket, Format};
use crate::models::game::MatchRef;
use crate::models::participant::{Participant, ParticipantId, ParticipantStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which scoring rule a reported result breaks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidResultReason {
    /// Best-of must be a positive odd number.
    EvenBestOf,
    NegativeScore,
    /// More games reported than the best-of allows, or a side above the win target.
    ExceedsBestOf,
    /// Neither side (or both) reached the win target.
    NoWinner,
    /// The named winner does not hold the winning score.
    WinnerMismatch,
}

impl std::fmt::Display for InvalidResultReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidResultReason::EvenBestOf => write!(f, "best-of must be odd"),
            InvalidResultReason::NegativeScore => write!(f, "negative score"),
            InvalidResultReason::ExceedsBestOf => write!(f, "exceeds best-of"),
            InvalidResultReason::NoWinner => write!(f, "no winner"),
            InvalidResultReason::WinnerMismatch => write!(f, "winner does not hold the winning score"),
        }
    }
}

impl std::error::Error for InvalidResultReason {}

/// Errors that can occur during bracket operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Fewer than 2 eligible participants.
    InsufficientParticipants { eligible: usize },
    UnsupportedFormat(String),
    /// Seed order requested for a size that is not a power of two.
    InvalidBracketSize(u32),
    /// Winner is not one of the two participants of the match.
    InvalidWinner { match_ref: MatchRef, winner: ParticipantId },
    /// Result already recorded (or the match resolved as a bye / was skipped).
    MatchAlreadyDecided(MatchRef),
    /// Match still waits for one of its participants.
    MatchNotReady(MatchRef),
    MatchNotFound(MatchRef),
    InvalidResult(InvalidResultReason),
    /// Two participants share a manual seed.
    DuplicateSeed(u32),
    /// Seeds are positive integers.
    InvalidSeed(u32),
    DuplicateParticipant(ParticipantId),
    ParticipantNotFound(ParticipantId),
    /// Format and best-of are fixed while a bracket exists.
    BracketExists,
    NoBracket,
    /// Regeneration or deletion after real results were recorded.
    ResultsRecorded,
    /// Caller acted on an older bracket revision than the current one.
    StaleBracket { expected: u64, found: u64 },
    TournamentNotFound(TournamentId),
    /// Participant roster could not be read.
    Import(String),
    LockPoisoned,
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InsufficientParticipants { eligible } => {
                write!(f, "Need at least 2 eligible participants (have {})", eligible)
            }
            BracketError::UnsupportedFormat(format) => write!(f, "Unsupported format: {}", format),
            BracketError::InvalidBracketSize(size) => {
                write!(f, "Bracket size {} is not a power of two", size)
            }
            BracketError::InvalidWinner { match_ref, winner } => {
                write!(f, "{} is not playing in match {}", winner, match_ref)
            }
            BracketError::MatchAlreadyDecided(m) => write!(f, "Match {} is already decided", m),
            BracketError::MatchNotReady(m) => write!(f, "Match {} is still waiting for a participant", m),
            BracketError::MatchNotFound(m) => write!(f, "Match {} not found", m),
            BracketError::InvalidResult(reason) => write!(f, "Invalid result: {}", reason),
            BracketError::DuplicateSeed(seed) => write!(f, "Seed {} is assigned more than once", seed),
            BracketError::InvalidSeed(seed) => write!(f, "Seed {} is not a positive integer", seed),
            BracketError::DuplicateParticipant(id) => write!(f, "Participant {} already registered", id),
            BracketError::ParticipantNotFound(id) => write!(f, "Participant {} not found", id),
            BracketError::BracketExists => write!(f, "A bracket exists; delete it first"),
            BracketError::NoBracket => write!(f, "No bracket has been generated"),
            BracketError::ResultsRecorded => {
                write!(f, "Results have been recorded; the bracket can no longer be replaced")
            }
            BracketError::StaleBracket { expected, found } => write!(
                f,
                "Bracket revision is {} but request was made against revision {}",
                found, expected
            ),
            BracketError::TournamentNotFound(id) => write!(f, "Tournament {} not found", id),
            BracketError::Import(msg) => write!(f, "Could not read participants: {}", msg),
            BracketError::LockPoisoned => write!(f, "Tournament state lock poisoned"),
        }
    }
}

impl std::error::Error for BracketError {}

impl From<InvalidResultReason> for BracketError {
    fn from(reason: InvalidResultReason) -> Self {
        BracketError::InvalidResult(reason)
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

fn default_best_of() -> u32 {
    3
}

/// A tournament: its roster, settings and (once generated) its bracket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub format: Format,
    /// Games per match; results are validated against it.
    #[serde(default = "default_best_of")]
    pub best_of: u32,
    pub participants: Vec<Participant>,
    pub bracket: Option<Bracket>,
    /// Bumped on every generation or deletion of the bracket.
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a tournament with no participants and no bracket.
    pub fn new(name: impl Into<String>, format: Format, best_of: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            format,
            best_of,
            participants: Vec::new(),
            bracket: None,
            revision: 0,
            updated_at: Utc::now(),
        }
    }

    /// Create a tournament with an initial roster.
    pub fn with_participants(participants: Vec<Participant>, format: Format, best_of: u32) -> Self {
        Self {
            participants,
            ..Self::new("", format, best_of)
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Participants that would be placed in a bracket generated now.
    pub fn eligible_participants(&self) -> Vec<Participant> {
        self.participants.iter().filter(|p| p.is_eligible()).cloned().collect()
    }

    /// Register a participant. Ids are unique within the tournament.
    pub fn add_participant(&mut self, participant: Participant) -> Result<(), BracketError> {
        if self.participants.iter().any(|p| p.id == participant.id) {
            return Err(BracketError::DuplicateParticipant(participant.id));
        }
        if participant.seed == Some(0) {
            return Err(BracketError::InvalidSeed(0));
        }
        self.participants.push(participant);
        self.touch();
        Ok(())
    }

    /// Check in or withdraw a participant. Takes effect at the next generation.
    pub fn set_participant_status(
        &mut self,
        id: &ParticipantId,
        status: ParticipantStatus,
    ) -> Result<(), BracketError> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| BracketError::ParticipantNotFound(id.clone()))?;
        participant.status = status;
        self.touch();
        Ok(())
    }

    /// Change the format (only while no bracket exists).
    pub fn set_format(&mut self, format: Format) -> Result<(), BracketError> {
        if self.bracket.is_some() {
            return Err(BracketError::BracketExists);
        }
        self.format = format;
        self.touch();
        Ok(())
    }

    /// Change the best-of (only while no bracket exists).
    pub fn set_best_of(&mut self, best_of: u32) -> Result<(), BracketError> {
        if self.bracket.is_some() {
            return Err(BracketError::BracketExists);
        }
        self.best_of = best_of;
        self.touch();
        Ok(())
    }

    /// Fail with `StaleBracket` unless `expected` matches the current revision.
    pub fn check_revision(&self, expected: Option<u64>) -> Result<(), BracketError> {
        match expected {
            Some(expected) if expected != self.revision => Err(BracketError::StaleBracket {
                expected,
                found: self.revision,
            }),
            _ => Ok(()),
        }
    }
}
