//! Finals: the current top four humans racing each other as one group.
//!
//! A finals match is never flagged up front. Any match whose four players are
//! exactly the top four by total score at the moment it is scored counts as
//! the finals, and scoring it completes the tournament.

use crate::models::{GameMatch, Player, PlayerId, Tournament, TournamentError, SLOTS};
use crate::store::UnitOfWork;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

/// Sum of recorded scores per id. Ids without any scored slot map to 0.
pub fn totals_for_player_ids(
    matches: &[GameMatch],
    ids: &HashSet<PlayerId>,
) -> HashMap<PlayerId, u32> {
    let mut totals: HashMap<PlayerId, u32> = ids.iter().map(|&id| (id, 0)).collect();
    for m in matches {
        for (id, score) in m.slot_scores() {
            if let (Some(score), Some(total)) = (score, totals.get_mut(&id)) {
                *total += score;
            }
        }
    }
    totals
}

/// The first `n` of `players` by total score, highest first.
///
/// Only the total is compared: players with equal totals keep their input order.
pub fn top_n_by_totals(players: &[Player], matches: &[GameMatch], n: usize) -> Vec<Player> {
    let ids: HashSet<PlayerId> = players.iter().map(|p| p.id).collect();
    let totals = totals_for_player_ids(matches, &ids);
    let mut ranked = players.to_vec();
    ranked.sort_by_key(|p| Reverse(totals.get(&p.id).copied().unwrap_or(0)));
    ranked.truncate(n);
    ranked
}

/// First match whose four players, as a set, are exactly `ids`.
pub fn find_exact_match<'m>(
    matches: &'m [GameMatch],
    ids: &HashSet<PlayerId>,
) -> Option<&'m GameMatch> {
    if ids.len() != SLOTS {
        return None;
    }
    matches.iter().find(|m| m.player_set() == *ids)
}

/// Ids of the current top four humans, or None with fewer than four humans.
pub fn top_four_ids(tournament: &Tournament) -> Option<HashSet<PlayerId>> {
    let top = top_n_by_totals(&tournament.humans(), &tournament.matches, SLOTS);
    (top.len() == SLOTS).then(|| top.iter().map(|p| p.id).collect())
}

/// True if `game` seats exactly the current top four humans.
pub fn is_finals_match(tournament: &Tournament, game: &GameMatch) -> bool {
    top_four_ids(tournament).is_some_and(|top| game.player_set() == top)
}

/// Schedule the finals: one match for the current top four at the next round.
pub fn generate_finals(tx: &mut UnitOfWork<'_>) -> Result<GameMatch, TournamentError> {
    let top = top_n_by_totals(&tx.tournament().humans(), tx.matches(), SLOTS);
    if top.len() < SLOTS {
        return Err(TournamentError::invalid(
            "Need at least 4 players to generate finals",
        ));
    }
    let ids: HashSet<PlayerId> = top.iter().map(|p| p.id).collect();
    if find_exact_match(tx.matches(), &ids).is_some() {
        return Err(TournamentError::DuplicateFinals);
    }
    let game = GameMatch::new(
        tx.tournament().next_round(),
        [top[0].id, top[1].id, top[2].id, top[3].id],
    );
    log::info!(
        "finals for tournament {} at round {}: {}",
        tx.tournament_id(),
        game.round,
        top.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
    );
    tx.insert_match(game.clone());
    Ok(game)
}
