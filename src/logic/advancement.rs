//! Applying results: record the winner, push winner/loser downstream, cascade byes.

use crate::models::{
    Advancement, Bracket, BracketError, GameMatch, InvalidResultReason, MatchRef, MatchStatus,
    ParticipantId, SlotRef, Team,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// What one applied result changed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AppliedResult {
    /// The match the result was recorded on, after the update.
    pub updated: GameMatch,
    /// Every match touched (the match itself, filled slots, auto-resolved byes).
    pub changed: Vec<MatchRef>,
    /// Matches that now have both participants and can be played.
    pub newly_playable: Vec<GameMatch>,
}

/// Whether a slot has, awaits, or can never get an occupant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SlotState {
    Filled,
    Open,
    Void,
}

/// Bookkeeping for one propagation: what changed, what became playable, and
/// the pre-edit copy of every row touched so a failure can be rolled back.
#[derive(Default)]
struct Propagation {
    changed: Vec<MatchRef>,
    changed_seen: HashSet<MatchRef>,
    newly_playable: Vec<MatchRef>,
    playable_seen: HashSet<MatchRef>,
    saved: Vec<GameMatch>,
    saved_ids: HashSet<MatchRef>,
}

impl Propagation {
    fn mark_changed(&mut self, id: MatchRef) {
        if self.changed_seen.insert(id) {
            self.changed.push(id);
        }
    }

    fn mark_playable(&mut self, id: MatchRef) {
        if self.playable_seen.insert(id) {
            self.newly_playable.push(id);
        }
    }

    /// Mutable access to a row, saving its current state on first touch.
    fn edit<'b>(
        &mut self,
        bracket: &'b mut Bracket,
        id: &MatchRef,
    ) -> Result<&'b mut GameMatch, BracketError> {
        let m = bracket
            .get_mut(id)
            .ok_or(BracketError::MatchNotFound(*id))?;
        if self.saved_ids.insert(*id) {
            self.saved.push(m.clone());
        }
        Ok(m)
    }

    /// Put every touched row back the way it was.
    fn rollback(self, bracket: &mut Bracket) {
        for original in self.saved {
            if let Some(m) = bracket.get_mut(&original.id) {
                *m = original;
            }
        }
    }
}

/// Record `winner` on a pending match and advance participants downstream.
///
/// The bracket is only modified when the whole propagation succeeds.
pub fn apply_result(
    bracket: &mut Bracket,
    match_ref: &MatchRef,
    winner: &ParticipantId,
    team_1_score: u32,
    team_2_score: u32,
) -> Result<AppliedResult, BracketError> {
    let m = bracket
        .get(match_ref)
        .ok_or(BracketError::MatchNotFound(*match_ref))?;
    if !m.status.is_open() {
        return Err(BracketError::MatchAlreadyDecided(*match_ref));
    }
    if !m.has_both_teams() {
        return Err(BracketError::MatchNotReady(*match_ref));
    }
    let side = m.side_of(winner).ok_or_else(|| BracketError::InvalidWinner {
        match_ref: *match_ref,
        winner: winner.clone(),
    })?;
    let (winner_score, loser_score) = match side {
        Team::One => (team_1_score, team_2_score),
        Team::Two => (team_2_score, team_1_score),
    };
    if winner_score <= loser_score {
        return Err(InvalidResultReason::WinnerMismatch.into());
    }

    let mut propagation = Propagation::default();
    if let Err(e) = record(
        bracket,
        match_ref,
        winner,
        (team_1_score, team_2_score),
        &mut propagation,
    ) {
        propagation.rollback(bracket);
        return Err(e);
    }
    log::info!(
        "Match {} won by {} ({}-{})",
        match_ref,
        winner,
        team_1_score,
        team_2_score
    );

    let updated = bracket
        .get(match_ref)
        .cloned()
        .ok_or(BracketError::MatchNotFound(*match_ref))?;
    let newly_playable = propagation
        .newly_playable
        .iter()
        .filter_map(|id| bracket.get(id))
        .filter(|m| m.is_playable())
        .cloned()
        .collect();

    Ok(AppliedResult {
        updated,
        changed: propagation.changed,
        newly_playable,
    })
}

fn record(
    bracket: &mut Bracket,
    match_ref: &MatchRef,
    winner: &ParticipantId,
    (team_1_score, team_2_score): (u32, u32),
    propagation: &mut Propagation,
) -> Result<(), BracketError> {
    let m = propagation.edit(bracket, match_ref)?;
    m.winner = Some(winner.clone());
    m.team_1_score = Some(team_1_score);
    m.team_2_score = Some(team_2_score);
    m.status = MatchStatus::Completed;
    propagation.mark_changed(*match_ref);

    let mut queue = VecDeque::new();
    finish(bracket, match_ref, &mut queue, propagation)?;
    drain(bracket, queue, propagation)
}

/// Mark a playable match as being played. Results are accepted from `InProgress` too.
pub fn start_match(bracket: &mut Bracket, match_ref: &MatchRef) -> Result<(), BracketError> {
    let m = bracket
        .get_mut(match_ref)
        .ok_or(BracketError::MatchNotFound(*match_ref))?;
    match m.status {
        MatchStatus::InProgress => Ok(()),
        MatchStatus::Pending if m.has_both_teams() => {
            m.status = MatchStatus::InProgress;
            Ok(())
        }
        MatchStatus::Pending => Err(BracketError::MatchNotReady(*match_ref)),
        MatchStatus::Bye | MatchStatus::Completed | MatchStatus::Skipped => {
            Err(BracketError::MatchAlreadyDecided(*match_ref))
        }
    }
}

/// Settle a freshly built bracket: resolve every bye and everything it cascades into.
pub(crate) fn settle(bracket: &mut Bracket) -> Result<(), BracketError> {
    let queue = bracket.matches.iter().map(|m| m.id).collect();
    drain(bracket, queue, &mut Propagation::default())
}

/// Evaluate queued matches until no further byes or skips are produced.
fn drain(
    bracket: &mut Bracket,
    mut queue: VecDeque<MatchRef>,
    propagation: &mut Propagation,
) -> Result<(), BracketError> {
    while let Some(id) = queue.pop_front() {
        if evaluate(bracket, &id, propagation)? {
            finish(bracket, &id, &mut queue, propagation)?;
        }
    }
    Ok(())
}

fn slot_state(bracket: &Bracket, m: &GameMatch, team: Team) -> SlotState {
    if m.team(team).is_some() {
        return SlotState::Filled;
    }
    // Results are delivered in the same step a match finishes, so a finished
    // source that left this slot empty will never fill it.
    match m.source(team).and_then(|source| bracket.get(&source.from)) {
        Some(source) if !source.status.is_finished() => SlotState::Open,
        _ => SlotState::Void,
    }
}

/// Re-check a match after one of its slots changed. Returns true if it just finished
/// (auto-completed bye or skipped) and its outcome must be pushed downstream.
fn evaluate(
    bracket: &mut Bracket,
    id: &MatchRef,
    propagation: &mut Propagation,
) -> Result<bool, BracketError> {
    let current = bracket.get(id).ok_or(BracketError::MatchNotFound(*id))?;
    let current_status = current.status;
    if !matches!(current_status, MatchStatus::Pending | MatchStatus::Bye) {
        return Ok(false);
    }
    let states = (
        slot_state(bracket, current, Team::One),
        slot_state(bracket, current, Team::Two),
    );

    match states {
        (SlotState::Filled, SlotState::Filled) => {
            propagation.mark_playable(*id);
            Ok(false)
        }
        (SlotState::Filled, SlotState::Void) | (SlotState::Void, SlotState::Filled) => {
            let side = if states.0 == SlotState::Filled {
                Team::One
            } else {
                Team::Two
            };
            let m = propagation.edit(bracket, id)?;
            m.winner = m.team(side).cloned();
            m.status = MatchStatus::Completed;
            m.bye = true;
            log::debug!("Bye {} auto-advances {:?}", id, m.winner);
            propagation.mark_changed(*id);
            Ok(true)
        }
        (SlotState::Void, SlotState::Void) => {
            let m = propagation.edit(bracket, id)?;
            m.status = MatchStatus::Skipped;
            propagation.mark_changed(*id);
            log::debug!("Match {} has no possible participants, skipped", id);
            Ok(true)
        }
        (SlotState::Open, SlotState::Void) | (SlotState::Void, SlotState::Open) => {
            if current_status != MatchStatus::Bye {
                let m = propagation.edit(bracket, id)?;
                m.status = MatchStatus::Bye;
                m.bye = true;
                propagation.mark_changed(*id);
            }
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Push the outcome of a finished match into the slots it feeds.
fn finish(
    bracket: &mut Bracket,
    id: &MatchRef,
    queue: &mut VecDeque<MatchRef>,
    propagation: &mut Propagation,
) -> Result<(), BracketError> {
    let m = bracket.get(id).ok_or(BracketError::MatchNotFound(*id))?;
    let winner = m.winner.clone();
    let loser = m.loser().cloned();
    let upset = m.is_contested() && m.winner.is_some() && m.winner == m.team_2;
    let advancement = m.advancement;

    match advancement {
        Advancement::Terminal => {}
        Advancement::Winner { winner_to } => {
            deliver(bracket, winner_to, winner, queue, propagation)?;
        }
        Advancement::WinnerAndLoser {
            winner_to,
            loser_to,
        } => {
            deliver(bracket, winner_to, winner, queue, propagation)?;
            deliver(bracket, loser_to, loser, queue, propagation)?;
        }
        Advancement::GrandFinal { reset } => {
            let reset_match = propagation.edit(bracket, &reset)?;
            if upset {
                reset_match.team_1 = loser;
                reset_match.team_2 = winner;
                propagation.mark_changed(reset);
                queue.push_back(reset);
            } else if reset_match.status == MatchStatus::Pending {
                reset_match.status = MatchStatus::Skipped;
                propagation.mark_changed(reset);
                log::debug!("Grand final won by the winners-side finalist, reset {} skipped", reset);
            }
        }
    }
    Ok(())
}

fn deliver(
    bracket: &mut Bracket,
    slot: SlotRef,
    participant: Option<ParticipantId>,
    queue: &mut VecDeque<MatchRef>,
    propagation: &mut Propagation,
) -> Result<(), BracketError> {
    if let Some(participant) = participant {
        propagation
            .edit(bracket, &slot.to)?
            .set_team(slot.team, participant);
        propagation.mark_changed(slot.to);
    } else if bracket.get(&slot.to).is_none() {
        return Err(BracketError::MatchNotFound(slot.to));
    }
    queue.push_back(slot.to);
    Ok(())
}
