//! Single elimination: the upper bracket, also reused as the winners side of double elimination.

use crate::logic::builder::{elimination_rounds, seeded_slots};
use crate::models::{BracketError, BracketType, GameMatch, MatchRef, SeededParticipant, Source};

/// Single elimination bracket: `ceil(log2 N)` rounds, the last one tagged `Finals`.
pub(crate) fn build(seeded: &[SeededParticipant]) -> Result<(u32, Vec<GameMatch>), BracketError> {
    let rounds = elimination_rounds(seeded.len());
    let matches = upper_bracket(seeded, rounds, BracketType::Finals)?;
    Ok((rounds, matches))
}

/// Round 1 pairs adjacent slots of the seed order; round r match m is fed by
/// round r-1 matches 2m-1 (team 1) and 2m (team 2).
pub(crate) fn upper_bracket(
    seeded: &[SeededParticipant],
    rounds: u32,
    last_round_type: BracketType,
) -> Result<Vec<GameMatch>, BracketError> {
    let size = 1u32 << rounds;
    let slots = seeded_slots(seeded, size)?;
    let bracket_type = |round: u32| {
        if round == rounds {
            last_round_type
        } else {
            BracketType::Winners
        }
    };

    let mut matches = Vec::with_capacity(size as usize - 1);
    for (number, pair) in (1u32..).zip(slots.chunks_exact(2)) {
        matches.push(GameMatch::seeded(
            MatchRef::new(bracket_type(1), 1, number),
            pair[0].clone(),
            pair[1].clone(),
        ));
    }
    for round in 2..=rounds {
        let previous = |number| MatchRef::new(bracket_type(round - 1), round - 1, number);
        for number in 1..=(size >> round) {
            matches.push(GameMatch::fed(
                MatchRef::new(bracket_type(round), round, number),
                Source::winner_of(previous(2 * number - 1)),
                Source::winner_of(previous(2 * number)),
            ));
        }
    }
    Ok(matches)
}
