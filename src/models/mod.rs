//! Data structures for the bracket engine: participants, matches, brackets, tournaments.

mod bracket;
mod game;
mod participant;
mod tournament;

pub use bracket::{Bracket, Format};
pub use game::{
    Advancement, BracketType, GameMatch, MatchRef, MatchStatus, Outcome, SlotRef, Source, Team,
};
pub use participant::{Participant, ParticipantId, ParticipantStatus, SeededParticipant};
pub use tournament::{BracketError, InvalidResultReason, Tournament, TournamentId};
