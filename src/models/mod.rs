//! Data structures for the kart tournament: players, matches, tournament state.

mod game;
mod player;
mod tournament;

pub use game::{GameMatch, MatchId, SLOTS};
pub use player::{Player, PlayerId, PlayerKind, BOT_PREFIX};
pub use tournament::{Category, Tournament, TournamentError, TournamentId, TournamentStatus};
