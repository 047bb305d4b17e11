//! Round robin: every pair plays once, scheduled with the circle method.

use crate::models::{BracketType, GameMatch, MatchRef, ParticipantId, SeededParticipant};

/// Schedule all N(N-1)/2 pairings into sub-rounds where nobody plays twice.
///
/// Participants sit on a ring (plus an empty seat when N is odd); each round
/// pairs seat i with seat n-1-i, then every seat but the first rotates by one.
/// Pairings against the empty seat are rests, not matches.
pub(crate) fn build(seeded: &[SeededParticipant]) -> (u32, Vec<GameMatch>) {
    let mut ring: Vec<Option<&ParticipantId>> = seeded.iter().map(|p| Some(&p.id)).collect();
    if ring.len() % 2 == 1 {
        ring.push(None);
    }
    let seats = ring.len();
    let rounds = (seats - 1) as u32;

    let mut matches = Vec::with_capacity(seeded.len() * (seeded.len() - 1) / 2);
    for round in 1..=rounds {
        let mut number = 0;
        for i in 0..seats / 2 {
            if let (Some(a), Some(b)) = (ring[i], ring[seats - 1 - i]) {
                number += 1;
                matches.push(GameMatch::seeded(
                    MatchRef::new(BracketType::RoundRobin, round, number),
                    Some(a.clone()),
                    Some(b.clone()),
                ));
            }
        }
        ring[1..].rotate_right(1);
    }
    (rounds, matches)
}
