//! Bracket construction: format dispatch, advancement wiring and bye settlement.

use crate::logic::advancement;
use crate::logic::seeding::generate_seed_order;
use crate::logic::{double_elimination, round_robin, single_elimination};
use crate::models::{
    Advancement, Bracket, BracketError, BracketType, Format, GameMatch, MatchStatus, Outcome,
    ParticipantId, SeededParticipant, SlotRef, Team,
};
use chrono::Utc;
use std::collections::{HashMap, HashSet};

/// Build the full match graph for `seeded` participants in `format`.
///
/// Every match of every round is created up front, advancement links are
/// wired from the provenance back-references, and byes are settled (with
/// cascades) before the bracket is returned. Nothing is returned on error.
pub fn build_bracket(seeded: &[SeededParticipant], format: Format) -> Result<Bracket, BracketError> {
    if seeded.len() < 2 {
        return Err(BracketError::InsufficientParticipants {
            eligible: seeded.len(),
        });
    }
    check_seeds(seeded)?;

    let mut seeds = seeded.to_vec();
    seeds.sort_by_key(|p| p.seed);

    let (total_rounds, mut matches) = match format {
        Format::SingleElimination => single_elimination::build(&seeds)?,
        Format::DoubleElimination => double_elimination::build(&seeds)?,
        Format::RoundRobin => round_robin::build(&seeds),
    };
    wire(&mut matches);

    let mut bracket = Bracket::new(format, total_rounds, seeds, matches, Utc::now());
    advancement::settle(&mut bracket)?;
    bracket.total_matches = bracket
        .matches
        .iter()
        .filter(|m| !m.bye && m.status != MatchStatus::Skipped)
        .count();

    log::info!(
        "Generated {:?} bracket: {} participants, {} rounds, {} matches ({} rows)",
        format,
        bracket.participant_count,
        bracket.total_rounds,
        bracket.total_matches,
        bracket.matches.len()
    );
    Ok(bracket)
}

/// Rounds needed to reduce `participants` to one: ceil(log2(n)).
pub(crate) fn elimination_rounds(participants: usize) -> u32 {
    participants.max(2).next_power_of_two().trailing_zeros()
}

/// Bracket slots in seed order; slots past the last seed are byes (`None`).
pub(crate) fn seeded_slots(
    seeded: &[SeededParticipant],
    bracket_size: u32,
) -> Result<Vec<Option<ParticipantId>>, BracketError> {
    let by_seed: HashMap<u32, &ParticipantId> = seeded.iter().map(|p| (p.seed, &p.id)).collect();
    Ok(generate_seed_order(bracket_size)?
        .into_iter()
        .map(|seed| by_seed.get(&seed).map(|&id| id.clone()))
        .collect())
}

/// Seeds must be exactly 1..=N, each once, and ids unique.
fn check_seeds(seeded: &[SeededParticipant]) -> Result<(), BracketError> {
    let mut seen_seeds = HashSet::new();
    let mut seen_ids = HashSet::new();
    for p in seeded {
        if p.seed == 0 || p.seed as usize > seeded.len() {
            return Err(BracketError::InvalidSeed(p.seed));
        }
        if !seen_seeds.insert(p.seed) {
            return Err(BracketError::DuplicateSeed(p.seed));
        }
        if !seen_ids.insert(&p.id) {
            return Err(BracketError::DuplicateParticipant(p.id.clone()));
        }
    }
    Ok(())
}

/// Derive each match's forward links from the back-references of the matches it feeds.
///
/// Grand final sources are skipped: the first grand final carries its own
/// `Advancement::GrandFinal` since the reset is conditional.
pub(crate) fn wire(matches: &mut [GameMatch]) {
    let mut winner_to = HashMap::new();
    let mut loser_to = HashMap::new();
    for m in matches.iter() {
        for team in [Team::One, Team::Two] {
            let Some(source) = m.source(team) else {
                continue;
            };
            if source.from.bracket_type == BracketType::GrandFinal {
                continue;
            }
            let slot = SlotRef { to: m.id, team };
            match source.outcome {
                Outcome::Winner => winner_to.insert(source.from, slot),
                Outcome::Loser => loser_to.insert(source.from, slot),
            };
        }
    }

    for m in matches.iter_mut() {
        m.advancement = match (winner_to.remove(&m.id), loser_to.remove(&m.id)) {
            (Some(winner_to), Some(loser_to)) => Advancement::WinnerAndLoser {
                winner_to,
                loser_to,
            },
            (Some(winner_to), None) => Advancement::Winner { winner_to },
            _ => continue,
        };
        log::debug!("{} -> {:?}", m.id, m.advancement);
    }
}
