//! Record store: tournaments by id, with unit-of-work commits and optional JSON snapshots.
//!
//! Every mutating operation goes through [`Store::begin`], which hands out a
//! [`UnitOfWork`] over a working copy of one tournament. Service functions
//! stage their inserts, deletes and updates on it; the caller decides whether
//! to [`UnitOfWork::commit`]. Dropping it without committing discards every
//! staged change.

use crate::models::{
    GameMatch, MatchId, Player, PlayerId, Tournament, TournamentError, TournamentId,
    TournamentStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Failure to read or write a snapshot file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot format: {0}")]
    Format(#[from] serde_json::Error),
}

/// On-disk layout of a snapshot.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    tournaments: Vec<Tournament>,
}

/// All tournaments, keyed by id.
#[derive(Debug, Default)]
pub struct Store {
    tournaments: HashMap<TournamentId, Tournament>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot written by [`Store::save`]. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let data = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&data)?;
        let tournaments = snapshot
            .tournaments
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        Ok(Self { tournaments })
    }

    /// Write all tournaments as pretty JSON (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let snapshot = Snapshot {
            tournaments: self.list().into_iter().cloned().collect(),
        };
        let data = serde_json::to_string_pretty(&snapshot)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// All tournaments, oldest first.
    pub fn list(&self) -> Vec<&Tournament> {
        let mut all: Vec<&Tournament> = self.tournaments.values().collect();
        all.sort_by_key(|t| t.created_at);
        all
    }

    pub fn get(&self, id: TournamentId) -> Result<&Tournament, TournamentError> {
        self.tournaments
            .get(&id)
            .ok_or(TournamentError::NotFound("Tournament"))
    }

    pub fn insert(&mut self, tournament: Tournament) -> TournamentId {
        let id = tournament.id;
        self.tournaments.insert(id, tournament);
        id
    }

    /// Remove a tournament together with all of its players and matches.
    pub fn remove(&mut self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.tournaments
            .remove(&id)
            .ok_or(TournamentError::NotFound("Tournament"))
    }

    /// Start a unit of work on one tournament.
    pub fn begin(&mut self, id: TournamentId) -> Result<UnitOfWork<'_>, TournamentError> {
        let working = self.get(id)?.clone();
        Ok(UnitOfWork {
            store: self,
            working,
        })
    }
}

/// Staged changes to a single tournament. Nothing is visible in the store until `commit`.
pub struct UnitOfWork<'a> {
    store: &'a mut Store,
    working: Tournament,
}

impl<'a> UnitOfWork<'a> {
    /// Working copy, including everything staged so far.
    pub fn tournament(&self) -> &Tournament {
        &self.working
    }

    pub fn tournament_id(&self) -> TournamentId {
        self.working.id
    }

    pub fn players(&self) -> &[Player] {
        &self.working.players
    }

    pub fn matches(&self) -> &[GameMatch] {
        &self.working.matches
    }

    pub fn insert_player(&mut self, player: Player) -> PlayerId {
        let id = player.id;
        self.working.players.push(player);
        id
    }

    pub fn insert_match(&mut self, game: GameMatch) -> MatchId {
        let id = game.id;
        self.working.matches.push(game);
        id
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, TournamentError> {
        self.working
            .get_player_mut(id)
            .ok_or(TournamentError::NotFound("Player"))
    }

    pub fn match_mut(&mut self, id: MatchId) -> Result<&mut GameMatch, TournamentError> {
        self.working
            .get_match_mut(id)
            .ok_or(TournamentError::NotFound("Match"))
    }

    pub fn delete_player(&mut self, id: PlayerId) -> Result<Player, TournamentError> {
        let idx = self
            .working
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::NotFound("Player"))?;
        Ok(self.working.players.remove(idx))
    }

    /// Delete every match of the tournament. Returns how many were removed.
    pub fn delete_matches(&mut self) -> usize {
        let removed = self.working.matches.len();
        self.working.matches.clear();
        removed
    }

    pub fn set_status(&mut self, status: TournamentStatus) {
        self.working.status = status;
    }

    /// Write the working copy back to the store.
    pub fn commit(self) -> &'a Tournament {
        let UnitOfWork { store, working } = self;
        let id = working.id;
        log::debug!(
            "commit tournament {} ({} players, {} matches)",
            id,
            working.players.len(),
            working.matches.len()
        );
        store.tournaments.insert(id, working);
        &store.tournaments[&id]
    }
}
