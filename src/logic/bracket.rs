//! Simple bracket mode: one round of full four-human races.

use crate::logic::standings::compute_player_statistics;
use crate::models::{GameMatch, PlayerId, TournamentError, SLOTS};
use crate::store::UnitOfWork;
use rand::seq::SliceRandom;
use rand::Rng;

/// With at least this many humans, later rounds split strong and weak players.
const SPLIT_THRESHOLD: usize = 8;

/// Generate the next round of races from the humans.
///
/// 1. The round is the next free round tag; every match shares it.
/// 2. From the second round on, with 8+ humans: top 4 race each other and
///    bottom 4 race each other (each group shuffled).
/// 3. Otherwise shuffle everyone and race in blocks of 4; a remainder below 4 sits out.
pub fn generate_bracket<R: Rng + ?Sized>(
    tx: &mut UnitOfWork<'_>,
    rng: &mut R,
) -> Result<Vec<GameMatch>, TournamentError> {
    let humans = tx.tournament().humans();
    if humans.len() < SLOTS {
        return Err(TournamentError::invalid(
            "Need at least 4 players to generate a bracket",
        ));
    }
    let round = tx.tournament().next_round();
    let ranked: Vec<PlayerId> = compute_player_statistics(&humans, tx.matches())
        .iter()
        .map(|s| s.player.id)
        .collect();

    let groups: Vec<Vec<PlayerId>> = if round > 1 && ranked.len() >= SPLIT_THRESHOLD {
        let mut top = ranked[..SLOTS].to_vec();
        let mut bottom = ranked[ranked.len() - SLOTS..].to_vec();
        top.shuffle(rng);
        bottom.shuffle(rng);
        vec![top, bottom]
    } else {
        let mut all = ranked;
        all.shuffle(rng);
        all.chunks_exact(SLOTS).map(<[PlayerId]>::to_vec).collect()
    };

    let mut created = Vec::with_capacity(groups.len());
    for group in groups {
        let slots = [group[0], group[1], group[2], group[3]];
        let game = GameMatch::new(round, slots);
        tx.insert_match(game.clone());
        created.push(game);
    }
    log::info!(
        "bracket round {} for tournament {}: {} match(es)",
        round,
        tx.tournament_id(),
        created.len()
    );
    Ok(created)
}
