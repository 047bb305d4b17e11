//! Integration tests for the registry's locking discipline.

use bracket_engine::{
    BracketError, BracketType, Format, MatchRef, Participant, ParticipantId, SeedingMethod,
    Tournament, TournamentRegistry,
};
use chrono::{Duration, Utc};
use std::thread;
use uuid::Uuid;

fn registry_with_tournament(n: u32) -> (TournamentRegistry, Uuid) {
    let participants: Vec<Participant> = (1..=n)
        .map(|i| Participant::new(format!("P{i}")).with_seed(i))
        .collect();
    let registry = TournamentRegistry::new();
    let id = registry
        .insert(Tournament::with_participants(participants, Format::SingleElimination, 3))
        .unwrap();
    (registry, id)
}

fn w(round: u32, number: u32) -> MatchRef {
    MatchRef::new(BracketType::Winners, round, number)
}

#[test]
fn concurrent_submissions_for_one_match_first_writer_wins() {
    let (registry, id) = registry_with_tournament(4);
    registry.generate(id, SeedingMethod::Manual, Some(0)).unwrap();

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = &registry;
                s.spawn(move || {
                    let (winner, s1, s2) = if i % 2 == 0 { ("P1", 2, 0) } else { ("P4", 0, 2) };
                    let winner = ParticipantId::new(winner);
                    (winner.clone(), registry.submit(id, Some(1), &w(1, 1), &winner, s1, s2))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners: Vec<_> = results.iter().filter(|(_, r)| r.is_ok()).map(|(w, _)| w.clone()).collect();
    assert_eq!(winners.len(), 1);
    for (_, result) in results.iter().filter(|(_, r)| r.is_err()) {
        assert_eq!(result.as_ref().unwrap_err(), &BracketError::MatchAlreadyDecided(w(1, 1)));
    }

    let snapshot = registry.snapshot(id).unwrap();
    let bracket = snapshot.bracket.unwrap();
    assert_eq!(bracket.get(&w(1, 1)).unwrap().winner.as_ref(), Some(&winners[0]));
}

#[test]
fn concurrent_submissions_for_different_matches_all_apply() {
    let (registry, id) = registry_with_tournament(8);
    registry.generate(id, SeedingMethod::Manual, None).unwrap();

    thread::scope(|s| {
        for (number, winner) in [(1, "P1"), (2, "P4"), (3, "P2"), (4, "P3")] {
            let registry = &registry;
            s.spawn(move || {
                registry
                    .submit(id, None, &w(1, number), &ParticipantId::new(winner), 2, 0)
                    .unwrap();
            });
        }
    });

    let bracket = registry.snapshot(id).unwrap().bracket.unwrap();
    assert_eq!(bracket.round(BracketType::Winners, 2).iter().filter(|m| m.is_playable()).count(), 2);
}

#[test]
fn losing_a_regeneration_race_reports_stale_state() {
    let (registry, id) = registry_with_tournament(6);

    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let registry = &registry;
                s.spawn(move || registry.generate(id, SeedingMethod::Random, Some(0)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| r == &Err(BracketError::StaleBracket { expected: 0, found: 1 })));
    assert_eq!(registry.snapshot(id).unwrap().revision, 1);
}

#[test]
fn stale_result_submission_is_rejected() {
    let (registry, id) = registry_with_tournament(4);
    registry.generate(id, SeedingMethod::Manual, None).unwrap();
    registry.generate(id, SeedingMethod::Manual, None).unwrap();
    assert_eq!(
        registry
            .submit(id, Some(1), &w(1, 1), &ParticipantId::new("P1"), 2, 0)
            .map(|_| ()),
        Err(BracketError::StaleBracket { expected: 1, found: 2 })
    );
}

#[test]
fn unknown_tournament_is_not_found() {
    let registry = TournamentRegistry::new();
    let missing = Uuid::new_v4();
    assert_eq!(
        registry.generate(missing, SeedingMethod::Manual, None),
        Err(BracketError::TournamentNotFound(missing))
    );
    assert_eq!(registry.remove(missing), Err(BracketError::TournamentNotFound(missing)));
}

#[test]
fn idle_tournaments_are_purged() {
    let registry = TournamentRegistry::new();
    let mut stale = Tournament::new("old", Format::RoundRobin, 1);
    stale.updated_at = Utc::now() - Duration::hours(48);
    registry.insert(stale).unwrap();
    let fresh = registry
        .insert(Tournament::new("new", Format::RoundRobin, 1))
        .unwrap();

    assert_eq!(registry.purge_inactive(Duration::hours(12)), Ok(1));
    assert_eq!(registry.len(), Ok(1));
    assert!(registry.snapshot(fresh).is_ok());
}

#[test]
fn len_counts_registered_tournaments() {
    let registry = TournamentRegistry::new();
    assert_eq!(registry.is_empty(), Ok(true));
    let id = registry
        .insert(Tournament::new("cup", Format::SingleElimination, 3))
        .unwrap();
    assert_eq!(registry.len(), Ok(1));
    registry.remove(id).unwrap();
    assert_eq!(registry.is_empty(), Ok(true));
}
