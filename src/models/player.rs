//! Player and PlayerKind data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in match slots and lookups).
pub type PlayerId = Uuid;

/// Name marker carried by every scheduler-created filler player.
pub const BOT_PREFIX: &str = "[BOT]";

/// Whether a player is a real racer or a filler created by the scheduler.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    #[default]
    Human,
    Bot,
}

/// A player in the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub kind: PlayerKind,
    /// Stored filename of the uploaded picture, if any.
    pub image: Option<String>,
}

impl Player {
    /// Create a new human player with the given (already sanitized) name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: PlayerKind::Human,
            image: None,
        }
    }

    /// Create the `seq`-th bot filler, named `"[BOT] <seq>"`.
    pub fn bot(seq: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("{BOT_PREFIX} {seq}"),
            kind: PlayerKind::Bot,
            image: None,
        }
    }

    pub fn is_bot(&self) -> bool {
        self.kind == PlayerKind::Bot
    }

    pub fn is_human(&self) -> bool {
        self.kind == PlayerKind::Human
    }
}
