//! Best-of-N score validation.

use crate::models::InvalidResultReason;

/// Games a side must win to take a best-of-`best_of` match.
pub fn wins_needed(best_of: u32) -> u32 {
    best_of / 2 + 1
}

/// Check that a reported score is a legal, decisive best-of-`best_of` result.
///
/// Rules are checked in order: odd best-of, no negative scores, no more games
/// than the format allows (and no side past the win target), exactly one side
/// on the win target.
pub fn validate_result(
    team_1_score: i32,
    team_2_score: i32,
    best_of: u32,
) -> Result<(), InvalidResultReason> {
    if best_of % 2 == 0 {
        return Err(InvalidResultReason::EvenBestOf);
    }
    if team_1_score < 0 || team_2_score < 0 {
        return Err(InvalidResultReason::NegativeScore);
    }
    let target = i64::from(wins_needed(best_of));
    let (a, b) = (i64::from(team_1_score), i64::from(team_2_score));
    if a + b > i64::from(best_of) || a > target || b > target {
        return Err(InvalidResultReason::ExceedsBestOf);
    }
    if (a == target) == (b == target) {
        return Err(InvalidResultReason::NoWinner);
    }
    Ok(())
}
