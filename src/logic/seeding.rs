//! Seeding: bracket seed order and seed assignment (random or manual).

use crate::models::{BracketError, Participant, SeededParticipant};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// How seeds are assigned before building a bracket.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingMethod {
    /// Uniformly random order.
    Random,
    /// Order by each participant's seed hint; participants without one go last.
    #[default]
    Manual,
}

impl FromStr for SeedingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(SeedingMethod::Random),
            "manual" => Ok(SeedingMethod::Manual),
            other => Err(format!("unknown seeding method: {}", other)),
        }
    }
}

/// Standard seeding permutation for a power-of-two bracket.
///
/// Slots are listed in bracket order so that adjacent pairs meet in round 1
/// and seeds 1 and 2 can only meet in the final. `generate_seed_order(8)` is
/// `[1, 8, 4, 5, 2, 7, 3, 6]`.
pub fn generate_seed_order(bracket_size: u32) -> Result<Vec<u32>, BracketError> {
    if !bracket_size.is_power_of_two() {
        return Err(BracketError::InvalidBracketSize(bracket_size));
    }
    let mut order = vec![1u32];
    while order.len() < bracket_size as usize {
        let sum = 2 * order.len() as u32 + 1;
        order = order.iter().flat_map(|&seed| [seed, sum - seed]).collect();
    }
    Ok(order)
}

/// Assign dense seeds 1..=N to the eligible participants using the thread-local RNG.
pub fn assign_seeds(
    participants: &[Participant],
    method: SeedingMethod,
) -> Result<Vec<SeededParticipant>, BracketError> {
    assign_seeds_with_rng(participants, method, &mut rand::thread_rng())
}

/// Assign dense seeds 1..=N to the eligible participants.
///
/// Withdrawn participants are dropped. Manual mode only uses seed hints for
/// ordering: the output is always renumbered 1..=N.
pub fn assign_seeds_with_rng<R: Rng + ?Sized>(
    participants: &[Participant],
    method: SeedingMethod,
    rng: &mut R,
) -> Result<Vec<SeededParticipant>, BracketError> {
    let mut eligible: Vec<&Participant> = participants.iter().filter(|p| p.is_eligible()).collect();

    match method {
        SeedingMethod::Random => eligible.shuffle(rng),
        SeedingMethod::Manual => {
            let mut seen = HashSet::new();
            for seed in eligible.iter().filter_map(|p| p.seed) {
                if seed == 0 {
                    return Err(BracketError::InvalidSeed(seed));
                }
                if !seen.insert(seed) {
                    return Err(BracketError::DuplicateSeed(seed));
                }
            }
            // Stable: participants without a hint keep registration order.
            eligible.sort_by_key(|p| p.seed.unwrap_or(u32::MAX));
        }
    }

    Ok(eligible
        .into_iter()
        .zip(1u32..)
        .map(|(p, seed)| SeededParticipant {
            id: p.id.clone(),
            seed,
        })
        .collect())
}
