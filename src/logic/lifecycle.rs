//! Tournament-level operations: generate or delete the bracket, submit results.

use crate::logic::advancement::{apply_result, AppliedResult};
use crate::logic::builder::build_bracket;
use crate::logic::seeding::{assign_seeds_with_rng, SeedingMethod};
use crate::logic::validation::validate_result;
use crate::models::{Bracket, BracketError, MatchRef, ParticipantId, Tournament};
use rand::Rng;

/// Seed the eligible participants and build the bracket, replacing any previous one.
///
/// Replacement is only allowed before the first real result; afterwards the
/// bracket is fixed and this fails with `ResultsRecorded`.
pub fn generate_bracket(
    tournament: &mut Tournament,
    method: SeedingMethod,
) -> Result<&Bracket, BracketError> {
    generate_bracket_with_rng(tournament, method, &mut rand::thread_rng())
}

/// Like [`generate_bracket`], with a caller-supplied RNG for random seeding.
pub fn generate_bracket_with_rng<'a, R: Rng + ?Sized>(
    tournament: &'a mut Tournament,
    method: SeedingMethod,
    rng: &mut R,
) -> Result<&'a Bracket, BracketError> {
    if tournament.bracket.as_ref().is_some_and(Bracket::has_results) {
        log::warn!("Refusing to regenerate bracket for {}: results recorded", tournament.id);
        return Err(BracketError::ResultsRecorded);
    }
    let seeded = assign_seeds_with_rng(&tournament.participants, method, rng)?;
    let bracket = build_bracket(&seeded, tournament.format)?;

    if tournament.bracket.is_some() {
        log::info!("Replacing bracket of tournament {}", tournament.id);
    }
    tournament.revision += 1;
    tournament.touch();
    Ok(tournament.bracket.insert(bracket))
}

/// Explicitly discard the bracket (only before any real result).
pub fn delete_bracket(tournament: &mut Tournament) -> Result<(), BracketError> {
    let bracket = tournament.bracket.as_ref().ok_or(BracketError::NoBracket)?;
    if bracket.has_results() {
        return Err(BracketError::ResultsRecorded);
    }
    tournament.bracket = None;
    tournament.revision += 1;
    tournament.touch();
    Ok(())
}

/// Validate a reported score against the tournament's best-of, then apply it.
pub fn submit_result(
    tournament: &mut Tournament,
    match_ref: &MatchRef,
    winner: &ParticipantId,
    team_1_score: i32,
    team_2_score: i32,
) -> Result<AppliedResult, BracketError> {
    let best_of = tournament.best_of;
    let bracket = tournament.bracket.as_mut().ok_or(BracketError::NoBracket)?;
    validate_result(team_1_score, team_2_score, best_of)?;
    let applied = apply_result(
        bracket,
        match_ref,
        winner,
        team_1_score.unsigned_abs(),
        team_2_score.unsigned_abs(),
    )?;
    tournament.touch();
    Ok(applied)
}
