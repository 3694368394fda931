//! Standings: per-player totals, wins and averages across every match.

use crate::models::{GameMatch, Player, PlayerId, Tournament, TournamentId, TournamentStatus};
use serde::Serialize;
use std::cmp::Ordering;

/// One row of the standings table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerStanding {
    pub player: Player,
    /// Matches the player sits in, scored or not.
    pub matches_played: u32,
    pub wins: u32,
    /// Sum of recorded scores only.
    pub total_score: u32,
    pub avg_score: f64,
    pub win_rate: f64,
}

impl PlayerStanding {
    fn for_player(player: &Player, matches: &[GameMatch]) -> Self {
        let mut matches_played = 0;
        let mut wins = 0;
        let mut total_score = 0;
        for m in matches.iter().filter(|m| m.involves(player.id)) {
            matches_played += 1;
            if let Some(score) = slot_score(m, player.id) {
                total_score += score;
            }
            if m.winner == Some(player.id) {
                wins += 1;
            }
        }
        let ratio = |n: u32| {
            if matches_played > 0 {
                f64::from(n) / f64::from(matches_played)
            } else {
                0.0
            }
        };
        Self {
            player: player.clone(),
            matches_played,
            wins,
            total_score,
            avg_score: ratio(total_score),
            win_rate: ratio(wins),
        }
    }
}

/// Recorded score of `player` in `game`, if they sit in it and it has been scored.
fn slot_score(game: &GameMatch, player: PlayerId) -> Option<u32> {
    game.slot_scores()
        .find(|(id, _)| *id == player)
        .and_then(|(_, score)| score)
}

/// Highest total first, then most wins, then best average.
fn by_rank(a: &PlayerStanding, b: &PlayerStanding) -> Ordering {
    b.total_score
        .cmp(&a.total_score)
        .then(b.wins.cmp(&a.wins))
        .then(b.avg_score.total_cmp(&a.avg_score))
}

/// Standings for `players` over `matches`, best first. Pass humans only;
/// bots are not ranked.
pub fn compute_player_statistics(players: &[Player], matches: &[GameMatch]) -> Vec<PlayerStanding> {
    let mut stats: Vec<PlayerStanding> = players
        .iter()
        .map(|p| PlayerStanding::for_player(p, matches))
        .collect();
    stats.sort_by(by_rank);
    stats
}

/// Everything the results view shows.
#[derive(Clone, Debug, Serialize)]
pub struct TournamentResults {
    pub tournament: ResultsHeader,
    pub standings: Vec<PlayerStanding>,
    pub matches: Vec<GameMatch>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ResultsHeader {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
}

/// Human standings plus all matches ordered by round.
pub fn results(tournament: &Tournament) -> TournamentResults {
    TournamentResults {
        tournament: ResultsHeader {
            id: tournament.id,
            name: tournament.name.clone(),
            status: tournament.status,
        },
        standings: compute_player_statistics(&tournament.humans(), &tournament.matches),
        matches: tournament.matches_by_round(),
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: usize,
    player: &'a str,
    matches_played: u32,
    wins: u32,
    total_score: u32,
    avg_score: String,
    win_rate: String,
}

const CSV_HEADER: [&str; 7] = [
    "rank",
    "player",
    "matches_played",
    "wins",
    "total_score",
    "avg_score",
    "win_rate",
];

/// Standings as CSV, one row per player in rank order. The header is written
/// even when there are no players.
pub fn standings_csv(standings: &[PlayerStanding]) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;
    for (i, s) in standings.iter().enumerate() {
        wtr.serialize(CsvRow {
            rank: i + 1,
            player: &s.player.name,
            matches_played: s.matches_played,
            wins: s.wins,
            total_score: s.total_score,
            avg_score: format!("{:.2}", s.avg_score),
            win_rate: format!("{:.2}", s.win_rate),
        })?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
