//! Double elimination: winners bracket, losers bracket and grand final (with reset).

use crate::logic::builder::elimination_rounds;
use crate::logic::single_elimination::upper_bracket;
use crate::models::{
    Advancement, BracketError, BracketType, GameMatch, MatchRef, SeededParticipant, Source,
};

fn winners(round: u32, number: u32) -> MatchRef {
    MatchRef::new(BracketType::Winners, round, number)
}

fn losers(round: u32, number: u32) -> MatchRef {
    MatchRef::new(BracketType::Losers, round, number)
}

/// Build the three sections of a double elimination bracket.
///
/// For every winners round `i + 1` (i >= 1) the losers bracket has two rounds:
/// `L(2i-1)` halves the field (pairing W1 losers when i = 1), then `L(2i)`
/// pairs each survivor with a loser dropping from `W(i+1)`. The winners
/// champion meets the losers champion in grand final round 1; round 2 is the
/// reset, only played when the losers-side finalist wins round 1.
pub(crate) fn build(seeded: &[SeededParticipant]) -> Result<(u32, Vec<GameMatch>), BracketError> {
    let rounds = elimination_rounds(seeded.len());
    let size = 1u32 << rounds;
    let mut matches = upper_bracket(seeded, rounds, BracketType::Winners)?;

    for i in 1..rounds {
        let count = size >> (i + 1);
        let thinning = 2 * i - 1;
        let drop_in = 2 * i;
        for j in 1..=count {
            let (team_1, team_2) = if i == 1 {
                (
                    Source::loser_of(winners(1, 2 * j - 1)),
                    Source::loser_of(winners(1, 2 * j)),
                )
            } else {
                (
                    Source::winner_of(losers(thinning - 1, 2 * j - 1)),
                    Source::winner_of(losers(thinning - 1, 2 * j)),
                )
            };
            matches.push(GameMatch::fed(losers(thinning, j), team_1, team_2));
        }
        for j in 1..=count {
            matches.push(GameMatch::fed(
                losers(drop_in, j),
                Source::winner_of(losers(thinning, j)),
                Source::loser_of(winners(i + 1, j)),
            ));
        }
    }

    let losers_champion = if rounds > 1 {
        Source::winner_of(losers(2 * (rounds - 1), 1))
    } else {
        Source::loser_of(winners(1, 1))
    };
    let first = MatchRef::new(BracketType::GrandFinal, 1, 1);
    let reset = MatchRef::new(BracketType::GrandFinal, 2, 1);

    let mut grand_final = GameMatch::fed(first, Source::winner_of(winners(rounds, 1)), losers_champion);
    grand_final.advancement = Advancement::GrandFinal { reset };
    matches.push(grand_final);
    // Sides are kept in the reset: the winners-side finalist (loser of round 1) stays team 1.
    matches.push(GameMatch::fed(reset, Source::loser_of(first), Source::winner_of(first)));

    Ok((rounds, matches))
}
