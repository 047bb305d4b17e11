//! Integration tests for double elimination: losers bracket wiring, byes, grand final reset.

use bracket_engine::{
    apply_result, build_bracket, standings, Advancement, Bracket, BracketType, Format, GameMatch,
    MatchRef, MatchStatus, ParticipantId, SeededParticipant, SlotRef, Team,
};

fn seeded(n: u32) -> Vec<SeededParticipant> {
    (1..=n)
        .map(|seed| SeededParticipant {
            id: ParticipantId::new(format!("P{seed}")),
            seed,
        })
        .collect()
}

fn id(name: &str) -> ParticipantId {
    ParticipantId::new(name)
}

fn w(round: u32, number: u32) -> MatchRef {
    MatchRef::new(BracketType::Winners, round, number)
}

fn l(round: u32, number: u32) -> MatchRef {
    MatchRef::new(BracketType::Losers, round, number)
}

fn gf(round: u32) -> MatchRef {
    MatchRef::new(BracketType::GrandFinal, round, 1)
}

fn slot(to: MatchRef, team: Team) -> SlotRef {
    SlotRef { to, team }
}

/// Play every playable match, letting `pick` choose the winner.
fn play_with(bracket: &mut Bracket, pick: impl Fn(&Bracket, &GameMatch) -> Team) {
    loop {
        let next = bracket.playable_matches().next().map(|m| {
            let side = pick(bracket, m);
            (m.id, m.team(side).cloned().unwrap(), side)
        });
        let Some((match_ref, winner, side)) = next else {
            break;
        };
        let (s1, s2) = match side {
            Team::One => (2, 1),
            Team::Two => (1, 2),
        };
        apply_result(bracket, &match_ref, &winner, s1, s2).unwrap();
    }
}

fn better_seed(bracket: &Bracket, m: &GameMatch) -> Team {
    let a = m.team_1.as_ref().and_then(|p| bracket.seed_of(p));
    let b = m.team_2.as_ref().and_then(|p| bracket.seed_of(p));
    if a < b {
        Team::One
    } else {
        Team::Two
    }
}

#[test]
fn four_participants_wiring() {
    let bracket = build_bracket(&seeded(4), Format::DoubleElimination).unwrap();
    assert_eq!(bracket.total_rounds, 2);
    assert_eq!(bracket.total_matches, 7);
    assert_eq!(bracket.matches().len(), 7);

    let advancement = |r: MatchRef| bracket.get(&r).unwrap().advancement;
    assert_eq!(
        advancement(w(1, 1)),
        Advancement::WinnerAndLoser {
            winner_to: slot(w(2, 1), Team::One),
            loser_to: slot(l(1, 1), Team::One),
        }
    );
    assert_eq!(
        advancement(w(1, 2)),
        Advancement::WinnerAndLoser {
            winner_to: slot(w(2, 1), Team::Two),
            loser_to: slot(l(1, 1), Team::Two),
        }
    );
    assert_eq!(
        advancement(w(2, 1)),
        Advancement::WinnerAndLoser {
            winner_to: slot(gf(1), Team::One),
            loser_to: slot(l(2, 1), Team::Two),
        }
    );
    assert_eq!(
        advancement(l(1, 1)),
        Advancement::Winner {
            winner_to: slot(l(2, 1), Team::One)
        }
    );
    assert_eq!(
        advancement(l(2, 1)),
        Advancement::Winner {
            winner_to: slot(gf(1), Team::Two)
        }
    );
    assert_eq!(advancement(gf(1)), Advancement::GrandFinal { reset: gf(2) });
    assert_eq!(advancement(gf(2)), Advancement::Terminal);
}

#[test]
fn two_participants_meet_twice_at_most() {
    let mut bracket = build_bracket(&seeded(2), Format::DoubleElimination).unwrap();
    assert_eq!(bracket.total_matches, 3);
    assert_eq!(
        bracket.get(&w(1, 1)).unwrap().advancement,
        Advancement::WinnerAndLoser {
            winner_to: slot(gf(1), Team::One),
            loser_to: slot(gf(1), Team::Two),
        }
    );

    play_with(&mut bracket, better_seed);
    assert_eq!(bracket.get(&gf(2)).unwrap().status, MatchStatus::Skipped);
    assert_eq!(bracket.champion(), Some(&id("P1")));
}

#[test]
fn winners_side_finalist_skips_the_reset() {
    let mut bracket = build_bracket(&seeded(4), Format::DoubleElimination).unwrap();
    play_with(&mut bracket, better_seed);

    let first = bracket.get(&gf(1)).unwrap();
    assert_eq!((first.team_1.clone(), first.team_2.clone()), (Some(id("P1")), Some(id("P2"))));
    assert_eq!(first.winner, Some(id("P1")));
    assert_eq!(bracket.get(&gf(2)).unwrap().status, MatchStatus::Skipped);
    assert_eq!(bracket.champion(), Some(&id("P1")));
    assert!(bracket.is_complete());
    assert_eq!(bracket.matches().iter().filter(|m| m.is_contested()).count(), 6);
}

#[test]
fn losers_side_win_forces_reset() {
    let mut bracket = build_bracket(&seeded(4), Format::DoubleElimination).unwrap();
    play_with(&mut bracket, |b, m| {
        if m.id == gf(1) {
            Team::Two
        } else {
            better_seed(b, m)
        }
    });

    let reset = bracket.get(&gf(2)).unwrap();
    assert_eq!(reset.status, MatchStatus::Completed);
    // Winners-side finalist keeps team 1 in the reset.
    assert_eq!(reset.team_1, Some(id("P1")));
    assert_eq!(reset.team_2, Some(id("P2")));
    assert_eq!(reset.winner, Some(id("P1")));
    assert_eq!(bracket.champion(), Some(&id("P1")));
    assert_eq!(bracket.matches().iter().filter(|m| m.is_contested()).count(), 7);
}

#[test]
fn reset_becomes_playable_after_upset() {
    let mut bracket = build_bracket(&seeded(2), Format::DoubleElimination).unwrap();
    apply_result(&mut bracket, &w(1, 1), &id("P1"), 2, 0).unwrap();
    let applied = apply_result(&mut bracket, &gf(1), &id("P2"), 1, 2).unwrap();

    assert_eq!(applied.newly_playable.len(), 1);
    assert_eq!(applied.newly_playable[0].id, gf(2));
    assert_eq!(bracket.champion(), None);

    apply_result(&mut bracket, &gf(2), &id("P2"), 0, 2).unwrap();
    assert_eq!(bracket.champion(), Some(&id("P2")));
}

#[test]
fn three_participants_losers_bye_waits_for_its_entrant() {
    let mut bracket = build_bracket(&seeded(3), Format::DoubleElimination).unwrap();
    assert_eq!(bracket.total_matches, 5);

    let w1 = bracket.get(&w(1, 1)).unwrap();
    assert!(w1.bye);
    assert_eq!(w1.status, MatchStatus::Completed);

    let l1 = bracket.get(&l(1, 1)).unwrap();
    assert!(l1.bye);
    assert_eq!(l1.status, MatchStatus::Bye);
    assert!(l1.team_1.is_none() && l1.team_2.is_none());

    let applied = apply_result(&mut bracket, &w(1, 2), &id("P2"), 2, 0).unwrap();
    assert_eq!(applied.changed, vec![w(1, 2), w(2, 1), l(1, 1), l(2, 1)]);
    let playable: Vec<_> = applied.newly_playable.iter().map(|m| m.id).collect();
    assert_eq!(playable, vec![w(2, 1)]);

    let l1 = bracket.get(&l(1, 1)).unwrap();
    assert_eq!(l1.status, MatchStatus::Completed);
    assert_eq!(l1.winner, Some(id("P3")));
    assert_eq!(bracket.get(&l(2, 1)).unwrap().team_1, Some(id("P3")));
}

#[test]
fn five_participants_skip_unreachable_losers_matches() {
    let bracket = build_bracket(&seeded(5), Format::DoubleElimination).unwrap();
    assert_eq!(bracket.total_rounds, 3);
    assert_eq!(bracket.total_matches, 9);
    assert_eq!(bracket.matches().len(), 15);

    assert_eq!(bracket.get(&l(1, 1)).unwrap().status, MatchStatus::Bye);
    assert_eq!(bracket.get(&l(1, 2)).unwrap().status, MatchStatus::Skipped);
    assert_eq!(bracket.get(&l(2, 1)).unwrap().status, MatchStatus::Pending);
    assert_eq!(bracket.get(&l(2, 2)).unwrap().status, MatchStatus::Bye);
    assert_eq!(bracket.get(&l(3, 1)).unwrap().status, MatchStatus::Pending);
    assert_eq!(bracket.get(&l(4, 1)).unwrap().status, MatchStatus::Pending);
}

#[test]
fn match_count_is_two_n_minus_one() {
    for n in 2..=24u32 {
        let bracket = build_bracket(&seeded(n), Format::DoubleElimination).unwrap();
        assert_eq!(bracket.total_matches, 2 * (n as usize - 1) + 1, "n = {n}");
    }
}

#[test]
fn everyone_but_the_champion_is_eliminated_after_two_losses() {
    let picks: [fn(&Bracket, &GameMatch) -> Team; 3] = [
        better_seed,
        |b, m| better_seed(b, m).other(),
        |_, m| Team::for_source(m.id.number + m.id.round),
    ];
    for n in 2..=17u32 {
        for pick in picks {
            let mut bracket = build_bracket(&seeded(n), Format::DoubleElimination).unwrap();
            play_with(&mut bracket, pick);
            assert!(bracket.is_complete(), "n = {n}");

            let champion = bracket.champion().cloned().expect("champion");
            for s in standings(&bracket) {
                if s.participant == champion {
                    assert!(s.losses <= 1, "n = {n}: champion lost {}", s.losses);
                } else {
                    assert_eq!(s.losses, 2, "n = {n}: {} lost {}", s.participant, s.losses);
                }
            }

            let played = bracket.matches().iter().filter(|m| m.is_contested()).count();
            let reset_played = bracket.get(&gf(2)).unwrap().status == MatchStatus::Completed;
            let expected = 2 * (n as usize - 1) + usize::from(reset_played);
            assert_eq!(played, expected, "n = {n}");
        }
    }
}
