//! Recording race results: finishing positions or direct scores to points and a winner.

use crate::logic::finals::is_finals_match;
use crate::models::{MatchId, PlayerId, TournamentError, TournamentStatus, SLOTS};
use crate::store::UnitOfWork;
use serde::Serialize;
use std::collections::HashSet;

/// Points per finishing position: 1st gets 4, 4th gets 1.
pub const POSITION_POINTS: [u32; SLOTS] = [4, 3, 2, 1];

/// Accepted range for direct scores.
pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 10;

/// Raw per-slot fields as submitted, in slot order.
pub type RawFields = [String; SLOTS];

/// What the organizer typed in for one race.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResultSubmission {
    /// Finishing position per slot, a permutation of 1..=4.
    Positions(RawFields),
    /// Legacy input: raw score per slot, 1..=10, all different.
    Scores(RawFields),
}

impl ResultSubmission {
    /// Positions win when all four are filled in; otherwise fall back to scores.
    pub fn from_fields(positions: Option<RawFields>, scores: Option<RawFields>) -> Option<Self> {
        match (positions, scores) {
            (Some(p), _) if p.iter().all(|f| !f.trim().is_empty()) => Some(Self::Positions(p)),
            (_, Some(s)) => Some(Self::Scores(s)),
            _ => None,
        }
    }

    /// Validate and turn into stored points plus the winning slot index.
    pub fn evaluate(&self) -> Result<([u32; SLOTS], usize), TournamentError> {
        match self {
            Self::Positions(fields) => points_from_positions(fields),
            Self::Scores(fields) => points_from_scores(fields),
        }
    }
}

fn parse_fields(fields: &RawFields) -> Option<[i64; SLOTS]> {
    let mut out = [0i64; SLOTS];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.trim().parse().ok()?;
    }
    Some(out)
}

fn all_distinct(values: &[i64; SLOTS]) -> bool {
    values.iter().collect::<HashSet<_>>().len() == SLOTS
}

fn points_from_positions(fields: &RawFields) -> Result<([u32; SLOTS], usize), TournamentError> {
    let positions = parse_fields(fields).ok_or(TournamentError::InvalidPositions)?;
    let in_range = positions.iter().all(|p| (1..=SLOTS as i64).contains(p));
    if !in_range || !all_distinct(&positions) {
        return Err(TournamentError::InvalidPositions);
    }
    let points = positions.map(|p| POSITION_POINTS[(p - 1) as usize]);
    let winner = positions
        .iter()
        .position(|&p| p == 1)
        .ok_or(TournamentError::InvalidPositions)?;
    Ok((points, winner))
}

fn points_from_scores(fields: &RawFields) -> Result<([u32; SLOTS], usize), TournamentError> {
    let scores = parse_fields(fields)
        .ok_or_else(|| TournamentError::invalid("Scores must be whole numbers"))?;
    let in_range = scores.iter().all(|s| (MIN_SCORE..=MAX_SCORE).contains(s));
    if !in_range || !all_distinct(&scores) {
        return Err(TournamentError::InvalidScores);
    }
    let winner = (0..SLOTS)
        .max_by_key(|&i| scores[i])
        .ok_or(TournamentError::InvalidScores)?;
    Ok((scores.map(|s| s as u32), winner))
}

/// Result of recording one race.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct RecordOutcome {
    pub match_id: MatchId,
    pub winner: PlayerId,
    /// This race seated the reigning top four, so the tournament is now completed.
    pub completed: bool,
}

/// Store scores and winner for a match, overwriting any earlier result, then
/// complete the tournament if the match turns out to be the finals.
///
/// Nothing is staged when validation fails.
pub fn record_result(
    tx: &mut UnitOfWork<'_>,
    match_id: MatchId,
    submission: &ResultSubmission,
) -> Result<RecordOutcome, TournamentError> {
    tx.match_mut(match_id)?;
    let (points, winner_slot) = submission.evaluate()?;

    let game = tx.match_mut(match_id)?;
    game.scores = points.map(Some);
    let winner = game.players[winner_slot];
    game.winner = Some(winner);
    let game = game.clone();

    let completed = is_finals_match(tx.tournament(), &game);
    if completed {
        log::info!(
            "match {} seated the current top 4; tournament {} completed",
            match_id,
            tx.tournament_id()
        );
        tx.set_status(TournamentStatus::Completed);
    }
    Ok(RecordOutcome {
        match_id,
        winner,
        completed,
    })
}
