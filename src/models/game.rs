//! Match (race) between four player slots.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Every race has exactly this many player slots.
pub const SLOTS: usize = 4;

/// A single four-player race. Slots are ordered but carry no ranking.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// Sequence tag; several matches may share one.
    pub round: u32,
    pub players: [PlayerId; SLOTS],
    /// Per-slot points; None until the race has been recorded.
    pub scores: [Option<u32>; SLOTS],
    pub winner: Option<PlayerId>,
}

impl GameMatch {
    pub fn new(round: u32, players: [PlayerId; SLOTS]) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            players,
            scores: [None; SLOTS],
            winner: None,
        }
    }

    /// A match with any missing score has not been played yet.
    pub fn is_played(&self) -> bool {
        self.scores.iter().all(Option::is_some)
    }

    /// True if `player` occupies any slot.
    pub fn involves(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Slots paired with their recorded score.
    pub fn slot_scores(&self) -> impl Iterator<Item = (PlayerId, Option<u32>)> + '_ {
        self.players.iter().copied().zip(self.scores.iter().copied())
    }

    /// Unordered set of the players in this match.
    pub fn player_set(&self) -> HashSet<PlayerId> {
        self.players.iter().copied().collect()
    }
}
