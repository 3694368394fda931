//! Tournament lifecycle: create, end, reset, delete.

use crate::models::{Tournament, TournamentError, TournamentId, TournamentStatus};
use crate::store::{Store, UnitOfWork};
use crate::validate::{sanitize_name, MAX_NAME_LEN};

/// Create an active tournament with a sanitized name.
pub fn create_tournament(store: &mut Store, raw_name: &str) -> Result<TournamentId, TournamentError> {
    let name = sanitize_name(raw_name, MAX_NAME_LEN).ok_or_else(|| {
        TournamentError::invalid(
            "Invalid tournament name. Use letters, numbers, spaces, underscore, hyphen or dot (max 100).",
        )
    })?;
    let id = store.insert(Tournament::new(name));
    log::info!("created tournament {}", id);
    Ok(id)
}

/// Mark the tournament completed by hand.
pub fn end_tournament(tx: &mut UnitOfWork<'_>) {
    tx.set_status(TournamentStatus::Completed);
}

/// Delete every match but keep all players (bots included). Returns the number removed.
pub fn reset_matches(tx: &mut UnitOfWork<'_>) -> usize {
    let removed = tx.delete_matches();
    log::info!(
        "reset tournament {}: {} match(es) deleted",
        tx.tournament_id(),
        removed
    );
    removed
}

/// Delete a tournament with all of its players and matches.
pub fn delete_tournament(store: &mut Store, id: TournamentId) -> Result<Tournament, TournamentError> {
    let removed = store.remove(id)?;
    log::info!(
        "deleted tournament {} ({} players, {} matches)",
        id,
        removed.players.len(),
        removed.matches.len()
    );
    Ok(removed)
}
