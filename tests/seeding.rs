//! Integration tests for seeding: seed order permutation and seed assignment.

use bracket_engine::{
    assign_seeds_with_rng, generate_seed_order, BracketError, Participant, ParticipantStatus,
    SeedingMethod,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

#[test]
fn seed_order_for_eight_is_canonical() {
    assert_eq!(generate_seed_order(8).unwrap(), vec![1, 8, 4, 5, 2, 7, 3, 6]);
}

#[test]
fn seed_order_small_sizes() {
    assert_eq!(generate_seed_order(1).unwrap(), vec![1]);
    assert_eq!(generate_seed_order(2).unwrap(), vec![1, 2]);
    assert_eq!(generate_seed_order(4).unwrap(), vec![1, 4, 2, 3]);
}

#[test]
fn seed_order_is_a_permutation_for_powers_of_two() {
    for exp in 0..=10 {
        let size = 1u32 << exp;
        let mut order = generate_seed_order(size).unwrap();
        assert_eq!(order.len(), size as usize);
        // First-round opponents always add up to size + 1.
        if size > 1 {
            for pair in order.chunks_exact(2) {
                assert_eq!(pair[0] + pair[1], size + 1);
            }
        }
        order.sort_unstable();
        assert_eq!(order, (1..=size).collect::<Vec<_>>());
    }
}

#[test]
fn seed_order_top_seeds_in_opposite_halves() {
    let order = generate_seed_order(16).unwrap();
    let (top, bottom) = order.split_at(8);
    assert!(top.contains(&1));
    assert!(bottom.contains(&2));
}

#[test]
fn seed_order_rejects_non_power_of_two() {
    assert_eq!(generate_seed_order(6), Err(BracketError::InvalidBracketSize(6)));
    assert_eq!(generate_seed_order(0), Err(BracketError::InvalidBracketSize(0)));
}

#[test]
fn manual_seeding_sorts_by_hint_and_renumbers() {
    let participants = vec![
        Participant::new("a").with_seed(3),
        Participant::new("b"),
        Participant::new("c").with_seed(1),
        Participant::new("d").with_seed(7),
    ];
    let seeded =
        assign_seeds_with_rng(&participants, SeedingMethod::Manual, &mut StdRng::seed_from_u64(1)).unwrap();
    let order: Vec<_> = seeded.iter().map(|p| (p.id.as_str(), p.seed)).collect();
    assert_eq!(order, vec![("c", 1), ("a", 2), ("d", 3), ("b", 4)]);
}

#[test]
fn manual_seeding_keeps_registration_order_without_hints() {
    let participants = vec![Participant::new("x"), Participant::new("y"), Participant::new("z")];
    let seeded =
        assign_seeds_with_rng(&participants, SeedingMethod::Manual, &mut StdRng::seed_from_u64(1)).unwrap();
    let ids: Vec<_> = seeded.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["x", "y", "z"]);
}

#[test]
fn manual_seeding_rejects_duplicate_seed() {
    let participants = vec![
        Participant::new("a").with_seed(2),
        Participant::new("b").with_seed(2),
    ];
    assert_eq!(
        assign_seeds_with_rng(&participants, SeedingMethod::Manual, &mut StdRng::seed_from_u64(1)),
        Err(BracketError::DuplicateSeed(2))
    );
}

#[test]
fn withdrawn_participants_are_not_seeded() {
    let participants = vec![
        Participant::new("a").with_seed(1),
        Participant::new("b")
            .with_seed(1)
            .with_status(ParticipantStatus::Withdrawn),
        Participant::new("c").with_status(ParticipantStatus::CheckedIn),
    ];
    let seeded =
        assign_seeds_with_rng(&participants, SeedingMethod::Manual, &mut StdRng::seed_from_u64(1)).unwrap();
    let ids: Vec<_> = seeded.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn random_seeding_is_dense_and_reproducible() {
    let participants: Vec<_> = (0..10).map(|i| Participant::new(format!("P{i}")).with_seed(i + 1)).collect();
    let first =
        assign_seeds_with_rng(&participants, SeedingMethod::Random, &mut StdRng::seed_from_u64(42)).unwrap();
    let second =
        assign_seeds_with_rng(&participants, SeedingMethod::Random, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(first, second);

    let seeds: Vec<_> = first.iter().map(|p| p.seed).collect();
    assert_eq!(seeds, (1..=10).collect::<Vec<_>>());
    let mut ids: Vec<_> = first.iter().map(|p| p.id.as_str().to_string()).collect();
    ids.sort();
    let mut expected: Vec<_> = participants.iter().map(|p| p.id.as_str().to_string()).collect();
    expected.sort();
    assert_eq!(ids, expected);
}

#[test]
fn random_seeding_is_roughly_uniform() {
    let participants = vec![Participant::new("a"), Participant::new("b"), Participant::new("c")];
    let mut rng = StdRng::seed_from_u64(2024);
    let mut top_seed: HashMap<String, u32> = HashMap::new();
    for _ in 0..6000 {
        let seeded = assign_seeds_with_rng(&participants, SeedingMethod::Random, &mut rng).unwrap();
        *top_seed.entry(seeded[0].id.as_str().to_string()).or_default() += 1;
    }
    for id in ["a", "b", "c"] {
        let count = top_seed.get(id).copied().unwrap_or(0);
        assert!((1700..=2300).contains(&count), "{id} got seed 1 {count} times");
    }
}

#[test]
fn seeding_method_parses() {
    assert_eq!("random".parse::<SeedingMethod>(), Ok(SeedingMethod::Random));
    assert_eq!(" Manual ".parse::<SeedingMethod>(), Ok(SeedingMethod::Manual));
    assert!("snake".parse::<SeedingMethod>().is_err());
}
