//! Tournament format and the generated bracket.

use crate::models::game::{BracketType, GameMatch, MatchRef, MatchStatus};
use crate::models::participant::{ParticipantId, SeededParticipant};
use crate::models::tournament::BracketError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Bracket format. Fixed once a bracket has been generated.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[default]
    SingleElimination,
    DoubleElimination,
    RoundRobin,
}

impl FromStr for Format {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "single_elimination" => Ok(Format::SingleElimination),
            "double_elimination" => Ok(Format::DoubleElimination),
            "round_robin" => Ok(Format::RoundRobin),
            _ => Err(BracketError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Generated bracket: header plus every match row, created up front.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "BracketRows")]
pub struct Bracket {
    pub format: Format,
    /// Winners-bracket depth for elimination formats, sub-rounds for round robin.
    pub total_rounds: u32,
    /// Matches that need a real result (byes and unreachable matches excluded).
    pub total_matches: usize,
    pub participant_count: usize,
    pub generated_at: DateTime<Utc>,
    /// Seed assignment this bracket was built from.
    pub seeds: Vec<SeededParticipant>,
    /// All rows in generation order: winners rounds, losers rounds, finals.
    /// Rows are never added or removed after construction.
    pub(crate) matches: Vec<GameMatch>,
    /// Row position of every match, keyed by `(bracket_type, round, number)`.
    #[serde(skip)]
    index: HashMap<MatchRef, usize>,
}

/// Serialized form of a bracket; the lookup index is rebuilt on load.
#[derive(Deserialize)]
struct BracketRows {
    format: Format,
    total_rounds: u32,
    total_matches: usize,
    participant_count: usize,
    generated_at: DateTime<Utc>,
    seeds: Vec<SeededParticipant>,
    matches: Vec<GameMatch>,
}

impl From<BracketRows> for Bracket {
    fn from(rows: BracketRows) -> Self {
        let mut bracket = Bracket::new(
            rows.format,
            rows.total_rounds,
            rows.seeds,
            rows.matches,
            rows.generated_at,
        );
        bracket.total_matches = rows.total_matches;
        bracket.participant_count = rows.participant_count;
        bracket
    }
}

impl Bracket {
    /// Assemble a bracket from its rows. `total_matches` starts at zero.
    pub(crate) fn new(
        format: Format,
        total_rounds: u32,
        seeds: Vec<SeededParticipant>,
        matches: Vec<GameMatch>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let index = matches.iter().enumerate().map(|(i, m)| (m.id, i)).collect();
        Self {
            format,
            total_rounds,
            total_matches: 0,
            participant_count: seeds.len(),
            generated_at,
            seeds,
            matches,
            index,
        }
    }

    /// Every row, in generation order.
    pub fn matches(&self) -> &[GameMatch] {
        &self.matches
    }

    pub fn get(&self, id: &MatchRef) -> Option<&GameMatch> {
        self.index.get(id).and_then(|&i| self.matches.get(i))
    }

    pub(crate) fn get_mut(&mut self, id: &MatchRef) -> Option<&mut GameMatch> {
        let i = *self.index.get(id)?;
        self.matches.get_mut(i)
    }

    /// Matches of one round, ordered by match number.
    pub fn round(&self, bracket_type: BracketType, round: u32) -> Vec<&GameMatch> {
        let mut matches: Vec<_> = self
            .matches
            .iter()
            .filter(|m| m.id.bracket_type == bracket_type && m.id.round == round)
            .collect();
        matches.sort_by_key(|m| m.id.number);
        matches
    }

    /// Matches with both participants known and no result yet.
    pub fn playable_matches(&self) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().filter(|m| m.is_playable())
    }

    /// True once any real (non-bye) result has been recorded.
    pub fn has_results(&self) -> bool {
        self.matches.iter().any(|m| m.is_contested())
    }

    /// Every match has either finished or been skipped.
    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(|m| m.status.is_finished())
    }

    pub fn seed_of(&self, id: &ParticipantId) -> Option<u32> {
        self.seeds.iter().find(|s| s.id == *id).map(|s| s.seed)
    }

    /// Tournament winner for elimination formats. Round robin has no champion match.
    pub fn champion(&self) -> Option<&ParticipantId> {
        match self.format {
            Format::SingleElimination => self
                .matches
                .iter()
                .find(|m| m.id.bracket_type == BracketType::Finals)
                .and_then(|m| m.winner.as_ref()),
            Format::DoubleElimination => {
                let first = self.get(&MatchRef::new(BracketType::GrandFinal, 1, 1))?;
                let reset = self.get(&MatchRef::new(BracketType::GrandFinal, 2, 1))?;
                match reset.status {
                    MatchStatus::Completed => reset.winner.as_ref(),
                    MatchStatus::Skipped => first.winner.as_ref(),
                    _ => None,
                }
            }
            Format::RoundRobin => None,
        }
    }
}
