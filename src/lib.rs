//! Tournament bracket engine: library with models and bracket logic.
//!
//! Seeds participants, builds single elimination, double elimination and
//! round robin brackets, and advances winners (and losers) as results come in.

pub mod logic;
pub mod models;
pub mod registry;

pub use logic::{
    apply_result, assign_seeds, assign_seeds_with_rng, build_bracket, delete_bracket,
    generate_bracket, generate_bracket_with_rng, generate_seed_order, import_participants,
    read_participants, standings, start_match, submit_result, validate_result, wins_needed,
    AppliedResult, SeedingMethod, Standing,
};
pub use models::{
    Advancement, Bracket, BracketError, BracketType, Format, GameMatch, InvalidResultReason,
    MatchRef, MatchStatus, Outcome, Participant, ParticipantId, ParticipantStatus,
    SeededParticipant, SlotRef, Source, Team, Tournament, TournamentId,
};
pub use registry::{TournamentHandle, TournamentRegistry};
