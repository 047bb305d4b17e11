//! In-memory tournament registry enforcing the locking discipline for generation and results.
//!
//! The map lock is only held to look up, insert or remove an entry. Generating
//! a bracket and submitting a result both hold the tournament's own mutex, so
//! generation excludes every submission for that tournament and two
//! submissions for the same match are serialized (the second one sees the
//! match completed and fails with `MatchAlreadyDecided`). Different
//! tournaments never contend.

use crate::logic::{generate_bracket, submit_result, AppliedResult, SeedingMethod};
use crate::models::{Bracket, BracketError, MatchRef, ParticipantId, Tournament, TournamentId};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// Shared handle to one tournament.
pub type TournamentHandle = Arc<Mutex<Tournament>>;

#[derive(Debug, Default)]
pub struct TournamentRegistry {
    tournaments: RwLock<HashMap<TournamentId, TournamentHandle>>,
}

impl TournamentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tournament and return its id.
    pub fn insert(&self, tournament: Tournament) -> Result<TournamentId, BracketError> {
        let id = tournament.id;
        self.tournaments
            .write()
            .map_err(|_| BracketError::LockPoisoned)?
            .insert(id, Arc::new(Mutex::new(tournament)));
        Ok(id)
    }

    pub fn get(&self, id: TournamentId) -> Result<TournamentHandle, BracketError> {
        self.tournaments
            .read()
            .map_err(|_| BracketError::LockPoisoned)?
            .get(&id)
            .cloned()
            .ok_or(BracketError::TournamentNotFound(id))
    }

    pub fn remove(&self, id: TournamentId) -> Result<(), BracketError> {
        self.tournaments
            .write()
            .map_err(|_| BracketError::LockPoisoned)?
            .remove(&id)
            .map(|_| ())
            .ok_or(BracketError::TournamentNotFound(id))
    }

    pub fn len(&self) -> Result<usize, BracketError> {
        self.tournaments
            .read()
            .map(|tournaments| tournaments.len())
            .map_err(|_| BracketError::LockPoisoned)
    }

    pub fn is_empty(&self) -> Result<bool, BracketError> {
        self.len().map(|len| len == 0)
    }

    /// Run `f` with exclusive access to one tournament.
    pub fn with_tournament<T>(
        &self,
        id: TournamentId,
        f: impl FnOnce(&mut Tournament) -> Result<T, BracketError>,
    ) -> Result<T, BracketError> {
        let handle = self.get(id)?;
        let mut tournament = handle.lock().map_err(|_| BracketError::LockPoisoned)?;
        f(&mut tournament)
    }

    /// Copy of the tournament's current state.
    pub fn snapshot(&self, id: TournamentId) -> Result<Tournament, BracketError> {
        self.with_tournament(id, |t| Ok(t.clone()))
    }

    /// Generate (or regenerate) the bracket.
    ///
    /// `expected_revision` is the revision the caller last saw; if another
    /// generation got there first the call fails with `StaleBracket`.
    pub fn generate(
        &self,
        id: TournamentId,
        method: SeedingMethod,
        expected_revision: Option<u64>,
    ) -> Result<Bracket, BracketError> {
        self.with_tournament(id, |t| {
            t.check_revision(expected_revision)?;
            generate_bracket(t, method).cloned()
        })
    }

    /// Submit a result against the bracket revision the caller last saw.
    pub fn submit(
        &self,
        id: TournamentId,
        revision: Option<u64>,
        match_ref: &MatchRef,
        winner: &ParticipantId,
        team_1_score: i32,
        team_2_score: i32,
    ) -> Result<AppliedResult, BracketError> {
        self.with_tournament(id, |t| {
            t.check_revision(revision)?;
            submit_result(t, match_ref, winner, team_1_score, team_2_score)
        })
    }

    /// Drop tournaments untouched for longer than `max_idle`. Tournaments that are
    /// currently locked are in use and always kept. Returns how many were removed.
    pub fn purge_inactive(&self, max_idle: Duration) -> Result<usize, BracketError> {
        let cutoff = Utc::now() - max_idle;
        let mut tournaments = self
            .tournaments
            .write()
            .map_err(|_| BracketError::LockPoisoned)?;
        let before = tournaments.len();
        tournaments.retain(|_, handle| match handle.try_lock() {
            Ok(t) => t.updated_at >= cutoff,
            Err(_) => true,
        });
        Ok(before - tournaments.len())
    }
}
