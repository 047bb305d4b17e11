//! Match (game), slot sides, match references and advancement links.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which slot of a match a participant occupies (team 1 or team 2).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    #[default]
    One,
    Two,
}

impl Team {
    pub fn other(self) -> Self {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }

    /// Slot fed by source match `number` when two sources pair into one match:
    /// odd-numbered sources fill team 1, even-numbered fill team 2.
    pub fn for_source(number: u32) -> Self {
        if number % 2 == 1 {
            Team::One
        } else {
            Team::Two
        }
    }
}

/// Section of the bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    Winners,
    Losers,
    /// Final round of a single elimination bracket.
    Finals,
    /// Double elimination decider; round 2 is the bracket reset.
    GrandFinal,
    RoundRobin,
}

/// Identifies a match within one bracket: `(bracket_type, round, number)`, 1-indexed.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MatchRef {
    pub bracket_type: BracketType,
    pub round: u32,
    pub number: u32,
}

impl MatchRef {
    pub fn new(bracket_type: BracketType, round: u32, number: u32) -> Self {
        Self {
            bracket_type,
            round,
            number,
        }
    }
}

impl fmt::Display for MatchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.bracket_type {
            BracketType::Winners => "W",
            BracketType::Losers => "L",
            BracketType::Finals => "F",
            BracketType::GrandFinal => "GF",
            BracketType::RoundRobin => "RR",
        };
        write!(f, "{}{}-{}", prefix, self.round, self.number)
    }
}

/// Which result of a source match feeds a slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner,
    Loser,
}

/// Provenance of a slot: the winner or loser of an earlier match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub from: MatchRef,
    pub outcome: Outcome,
}

impl Source {
    pub fn winner_of(from: MatchRef) -> Self {
        Self {
            from,
            outcome: Outcome::Winner,
        }
    }

    pub fn loser_of(from: MatchRef) -> Self {
        Self {
            from,
            outcome: Outcome::Loser,
        }
    }
}

/// Forward pointer: the slot of a downstream match a result is written into.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SlotRef {
    pub to: MatchRef,
    pub team: Team,
}

/// Where the participants of a finished match go next.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advancement {
    /// Nothing downstream (single elimination final, grand final reset, round robin).
    #[default]
    Terminal,
    /// Only the winner moves on; the loser is eliminated.
    Winner { winner_to: SlotRef },
    /// Winners bracket of a double elimination: the loser drops to the losers bracket.
    WinnerAndLoser { winner_to: SlotRef, loser_to: SlotRef },
    /// First grand final: a win by the losers-bracket finalist (team 2) forces `reset`.
    GrandFinal { reset: MatchRef },
}

impl Advancement {
    pub fn winner_to(&self) -> Option<SlotRef> {
        match *self {
            Advancement::Winner { winner_to } | Advancement::WinnerAndLoser { winner_to, .. } => {
                Some(winner_to)
            }
            Advancement::Terminal | Advancement::GrandFinal { .. } => None,
        }
    }

    pub fn loser_to(&self) -> Option<SlotRef> {
        match *self {
            Advancement::WinnerAndLoser { loser_to, .. } => Some(loser_to),
            _ => None,
        }
    }
}

/// Lifecycle of a match. Only moves forward: pending/bye/in_progress -> completed or skipped.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    /// Only one occupant is possible; completes as soon as that occupant is known.
    Bye,
    InProgress,
    Completed,
    /// Can never be played: no possible occupant, or an unneeded grand final reset.
    Skipped,
}

impl MatchStatus {
    /// Whether a result may still be submitted.
    pub fn is_open(self) -> bool {
        matches!(self, MatchStatus::Pending | MatchStatus::InProgress)
    }

    pub fn is_finished(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Skipped)
    }
}

/// A single match between two slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchRef,
    /// None until decided, or forever when the slot is a bye.
    pub team_1: Option<ParticipantId>,
    pub team_2: Option<ParticipantId>,
    /// None for slots seeded straight from the participant list.
    pub team_1_from: Option<Source>,
    pub team_2_from: Option<Source>,
    pub winner: Option<ParticipantId>,
    pub team_1_score: Option<u32>,
    pub team_2_score: Option<u32>,
    pub status: MatchStatus,
    /// Set once the match is known to be a bye; stays set after it auto-completes.
    pub bye: bool,
    pub advancement: Advancement,
}

impl GameMatch {
    pub fn new(id: MatchRef) -> Self {
        Self {
            id,
            team_1: None,
            team_2: None,
            team_1_from: None,
            team_2_from: None,
            winner: None,
            team_1_score: None,
            team_2_score: None,
            status: MatchStatus::Pending,
            bye: false,
            advancement: Advancement::Terminal,
        }
    }

    /// Match seeded directly with participants (round 1, round robin).
    pub fn seeded(id: MatchRef, team_1: Option<ParticipantId>, team_2: Option<ParticipantId>) -> Self {
        Self {
            team_1,
            team_2,
            ..Self::new(id)
        }
    }

    /// Match fed by two earlier matches.
    pub fn fed(id: MatchRef, team_1_from: Source, team_2_from: Source) -> Self {
        Self {
            team_1_from: Some(team_1_from),
            team_2_from: Some(team_2_from),
            ..Self::new(id)
        }
    }

    pub fn team(&self, team: Team) -> Option<&ParticipantId> {
        match team {
            Team::One => self.team_1.as_ref(),
            Team::Two => self.team_2.as_ref(),
        }
    }

    pub fn set_team(&mut self, team: Team, id: ParticipantId) {
        match team {
            Team::One => self.team_1 = Some(id),
            Team::Two => self.team_2 = Some(id),
        }
    }

    pub fn score(&self, team: Team) -> Option<u32> {
        match team {
            Team::One => self.team_1_score,
            Team::Two => self.team_2_score,
        }
    }

    pub fn source(&self, team: Team) -> Option<Source> {
        match team {
            Team::One => self.team_1_from,
            Team::Two => self.team_2_from,
        }
    }

    /// Which side `id` plays on, if any.
    pub fn side_of(&self, id: &ParticipantId) -> Option<Team> {
        if self.team_1.as_ref() == Some(id) {
            Some(Team::One)
        } else if self.team_2.as_ref() == Some(id) {
            Some(Team::Two)
        } else {
            None
        }
    }

    pub fn has_both_teams(&self) -> bool {
        self.team_1.is_some() && self.team_2.is_some()
    }

    /// Ready to be played: both slots filled and no result yet.
    pub fn is_playable(&self) -> bool {
        self.status.is_open() && self.has_both_teams()
    }

    /// Played (not auto-advanced) to completion.
    pub fn is_contested(&self) -> bool {
        self.status == MatchStatus::Completed && !self.bye
    }

    /// The losing participant of a played match. Byes have no loser.
    pub fn loser(&self) -> Option<&ParticipantId> {
        if !self.is_contested() {
            return None;
        }
        let winner = self.winner.as_ref()?;
        let side = self.side_of(winner)?;
        self.team(side.other())
    }
}
