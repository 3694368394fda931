//! Tournament, TournamentStatus and the error taxonomy.

use crate::models::game::{GameMatch, MatchId};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
///
/// Every variant is recoverable: the unit of work that produced it is dropped
/// without committing, so the stored tournament is left as it was.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// Empty or malformed name, non-numeric field, or an edit a bot may not receive.
    #[error("{0}")]
    InvalidInput(String),
    /// Finishing positions are not a permutation of 1..=4.
    #[error("Positions must be whole numbers 1 to 4, each used exactly once")]
    InvalidPositions,
    /// Direct scores are out of range or not pairwise distinct.
    #[error("Scores must be between 1 and 10 and all different")]
    InvalidScores,
    /// Player still occupies a slot in at least one match.
    #[error("Player has matches and cannot be deleted")]
    PlayerInUse,
    /// The current top four already raced each other as a group.
    #[error("A finals match for the current top 4 already exists")]
    DuplicateFinals,
    /// Referenced tournament, player or match does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
}

/// Display category attached to an error (or notice) for the UI.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Info,
    Warning,
    Error,
}

impl TournamentError {
    pub fn category(&self) -> Category {
        match self {
            TournamentError::DuplicateFinals => Category::Info,
            TournamentError::InvalidInput(_)
            | TournamentError::InvalidPositions
            | TournamentError::InvalidScores
            | TournamentError::PlayerInUse => Category::Warning,
            TournamentError::NotFound(_) => Category::Error,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        TournamentError::InvalidInput(msg.into())
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Active,
    /// Finals scored or ended by hand. Matches may still be edited.
    Completed,
}

/// A tournament owns its players (humans and bots) and its matches.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
    pub players: Vec<Player>,
    pub matches: Vec<GameMatch>,
}

impl Tournament {
    /// Create a new active tournament with no players.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            status: TournamentStatus::Active,
            created_at: Utc::now(),
            players: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Human players in insertion order.
    pub fn humans(&self) -> Vec<Player> {
        self.players.iter().filter(|p| p.is_human()).cloned().collect()
    }

    /// Bot fillers in creation order.
    pub fn bots(&self) -> Vec<Player> {
        self.players.iter().filter(|p| p.is_bot()).cloned().collect()
    }

    /// Round tag for the next generated match: highest existing round + 1.
    pub fn next_round(&self) -> u32 {
        self.matches.iter().map(|m| m.round).max().unwrap_or(0) + 1
    }

    /// Matches ordered by round (stable within a round).
    pub fn matches_by_round(&self) -> Vec<GameMatch> {
        let mut matches = self.matches.clone();
        matches.sort_by_key(|m| m.round);
        matches
    }
}
