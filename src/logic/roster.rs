//! Roster: humans vs bot fillers, adding, renaming and deleting players.

use crate::models::{GameMatch, Player, PlayerId, TournamentError, BOT_PREFIX};
use crate::store::UnitOfWork;
use crate::validate::{sanitize_name, MAX_NAME_LEN};

/// Make sure the tournament has at least `min_count` bots. Never removes any.
/// Returns every bot of the tournament in creation order.
pub fn ensure_bots(tx: &mut UnitOfWork<'_>, min_count: usize) -> Vec<Player> {
    let existing = tx.players().iter().filter(|p| p.is_bot()).count();
    for seq in existing + 1..=min_count {
        let bot = Player::bot(seq);
        log::debug!("creating bot filler {}", bot.name);
        tx.insert_player(bot);
    }
    tx.tournament().bots()
}

/// True if `player` occupies any slot of any of `matches`.
pub fn player_in_any_match(matches: &[GameMatch], player: PlayerId) -> bool {
    matches.iter().any(|m| m.involves(player))
}

/// Validate a name a human is about to carry. Names are unique (case-insensitive);
/// `renaming` is skipped in that comparison.
fn human_name(
    tx: &UnitOfWork<'_>,
    raw: &str,
    renaming: Option<PlayerId>,
) -> Result<String, TournamentError> {
    let name = sanitize_name(raw, MAX_NAME_LEN).ok_or_else(|| {
        TournamentError::invalid(
            "Invalid name. Use letters, numbers, spaces, underscore, hyphen or dot (max 100).",
        )
    })?;
    if name.starts_with(BOT_PREFIX) {
        return Err(TournamentError::invalid("That name is reserved for bots"));
    }
    let is_duplicate = tx
        .players()
        .iter()
        .filter(|p| Some(p.id) != renaming)
        .any(|p| p.name.eq_ignore_ascii_case(&name));
    if is_duplicate {
        return Err(TournamentError::invalid(
            "A player with this name already exists",
        ));
    }
    Ok(name)
}

/// Add a human player.
pub fn add_player(tx: &mut UnitOfWork<'_>, raw_name: &str) -> Result<PlayerId, TournamentError> {
    let name = human_name(tx, raw_name, None)?;
    Ok(tx.insert_player(Player::new(name)))
}

/// Rename a human player. Bots keep their names.
pub fn rename_player(
    tx: &mut UnitOfWork<'_>,
    player_id: PlayerId,
    raw_name: &str,
) -> Result<(), TournamentError> {
    if tx.player_mut(player_id)?.is_bot() {
        return Err(TournamentError::invalid("Bots cannot be renamed"));
    }
    let name = human_name(tx, raw_name, Some(player_id))?;
    tx.player_mut(player_id)?.name = name;
    Ok(())
}

/// Delete a human player that has never been scheduled.
pub fn delete_player(
    tx: &mut UnitOfWork<'_>,
    player_id: PlayerId,
) -> Result<Player, TournamentError> {
    if tx.player_mut(player_id)?.is_bot() {
        return Err(TournamentError::invalid("Bots cannot be deleted"));
    }
    if player_in_any_match(tx.matches(), player_id) {
        return Err(TournamentError::PlayerInUse);
    }
    tx.delete_player(player_id)
}

/// Point a human player at a newly stored picture. Returns the replaced filename, if any.
pub fn set_player_image(
    tx: &mut UnitOfWork<'_>,
    player_id: PlayerId,
    stored_filename: String,
) -> Result<Option<String>, TournamentError> {
    let player = tx.player_mut(player_id)?;
    if player.is_bot() {
        return Err(TournamentError::invalid("Bots cannot have pictures"));
    }
    Ok(player.image.replace(stored_filename))
}
