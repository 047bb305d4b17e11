//! Standings: win/loss record per participant from played matches.

use crate::models::{Bracket, ParticipantId, SeededParticipant};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Record of one participant (for API / display). Byes count as neither win nor loss.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub participant: ParticipantId,
    pub seed: u32,
    pub wins: u32,
    pub losses: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

impl Standing {
    fn new(seeded: &SeededParticipant) -> Self {
        Self {
            participant: seeded.id.clone(),
            seed: seeded.seed,
            wins: 0,
            losses: 0,
            games_won: 0,
            games_lost: 0,
        }
    }

    pub fn game_difference(&self) -> i64 {
        i64::from(self.games_won) - i64::from(self.games_lost)
    }
}

/// Standings ordered by wins, then fewest losses, then game difference, then seed.
pub fn standings(bracket: &Bracket) -> Vec<Standing> {
    let mut table: Vec<Standing> = bracket.seeds.iter().map(Standing::new).collect();
    let position: HashMap<ParticipantId, usize> = table
        .iter()
        .enumerate()
        .map(|(i, s)| (s.participant.clone(), i))
        .collect();

    for m in bracket.matches().iter().filter(|m| m.is_contested()) {
        let (Some(winner), Some(loser)) = (m.winner.as_ref(), m.loser()) else {
            continue;
        };
        let Some(winner_side) = m.side_of(winner) else {
            continue;
        };
        let winner_games = m.score(winner_side).unwrap_or(0);
        let loser_games = m.score(winner_side.other()).unwrap_or(0);

        if let Some(s) = position.get(winner).and_then(|&i| table.get_mut(i)) {
            s.wins += 1;
            s.games_won += winner_games;
            s.games_lost += loser_games;
        }
        if let Some(s) = position.get(loser).and_then(|&i| table.get_mut(i)) {
            s.losses += 1;
            s.games_won += loser_games;
            s.games_lost += winner_games;
        }
    }

    table.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(a.losses.cmp(&b.losses))
            .then(b.game_difference().cmp(&a.game_difference()))
            .then(a.seed.cmp(&b.seed))
    });
    table
}
