//! Schedule planning: hand out the appearances every human still owes, four slots per race.
//!
//! 1. Each human owes `games_per_player` minus the races they already sit in.
//! 2. One pool entry per owed appearance, shuffled.
//! 3. `human_distribution` decides how many humans each race gets.
//! 4. Races are filled by scanning the pool for distinct players, then padded with bots.
//! 5. Whatever the headcounts did not place is drained in groups of 3 (or 2).

use crate::logic::distribution::human_distribution;
use crate::logic::roster::ensure_bots;
use crate::models::{GameMatch, PlayerId, TournamentError, SLOTS};
use crate::store::UnitOfWork;
use crate::validate::clamp_int;
use rand::seq::SliceRandom;
use rand::Rng;

/// Bounds for the games-per-player request.
pub const MIN_GAMES_PER_PLAYER: i64 = 1;
pub const MAX_GAMES_PER_PLAYER: i64 = 20;

/// Bots kept around for padding. A group has at least 2 humans, so 2 bots always suffice.
pub const MIN_BOTS: usize = 2;

/// Smallest group that makes a race.
const MIN_GROUP: usize = 2;

/// Owed appearances, one entry per slot a player still has to fill.
///
/// Extraction scans left to right and removes what it picks, so the order of
/// entries decides who ends up racing whom.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppearancePool {
    slots: Vec<PlayerId>,
}

impl AppearancePool {
    pub fn new(slots: Vec<PlayerId>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn as_slice(&self) -> &[PlayerId] {
        &self.slots
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.slots.shuffle(rng);
    }

    /// Remove up to `k` distinct ids, left to right. Further copies of an id
    /// already picked are skipped and stay in the pool.
    pub fn take_distinct(&mut self, k: usize) -> Vec<PlayerId> {
        let mut group: Vec<PlayerId> = Vec::with_capacity(k);
        self.slots.retain(|&id| {
            if group.len() < k && !group.contains(&id) {
                group.push(id);
                false
            } else {
                true
            }
        });
        group
    }

    /// Return picks to the end of the pool.
    pub fn put_back(&mut self, ids: Vec<PlayerId>) {
        self.slots.extend(ids);
    }
}

/// Take a group of up to `k` distinct players. If fewer than 2 come out, the
/// picks go back, the pool is reshuffled and exactly 2 are tried once more.
fn extract_group<R: Rng + ?Sized>(
    pool: &mut AppearancePool,
    k: usize,
    rng: &mut R,
) -> Option<Vec<PlayerId>> {
    let group = pool.take_distinct(k);
    if group.len() >= MIN_GROUP {
        return Some(group);
    }
    pool.put_back(group);
    pool.shuffle(rng);
    let retry = pool.take_distinct(MIN_GROUP);
    if retry.len() >= MIN_GROUP {
        Some(retry)
    } else {
        pool.put_back(retry);
        None
    }
}

/// Split the pool into groups of distinct humans: first one group per
/// headcount, then leftovers in groups of 3 (2 when fewer than 3 remain).
/// Stops once no group of at least 2 distinct players can be formed; whatever
/// is still in the pool then is left there.
pub fn assemble_groups<R: Rng + ?Sized>(
    pool: &mut AppearancePool,
    headcounts: &[u32],
    rng: &mut R,
) -> Vec<Vec<PlayerId>> {
    let mut groups = Vec::new();
    for &k in headcounts {
        match extract_group(pool, k as usize, rng) {
            Some(group) => groups.push(group),
            None => log::debug!("no group of {} possible, {} left in pool", k, pool.len()),
        }
    }
    while !pool.is_empty() {
        let k = if pool.len() >= 3 { 3 } else { MIN_GROUP };
        match extract_group(pool, k, rng) {
            Some(group) => groups.push(group),
            None => break,
        }
    }
    groups
}

/// Fill the empty slots of `group` with bots, cycling through `bots` from the start.
pub fn pad_with_bots(group: &[PlayerId], bots: &[PlayerId]) -> [PlayerId; SLOTS] {
    let mut slots = [PlayerId::nil(); SLOTS];
    let mut cycle = bots.iter().cycle();
    for (i, slot) in slots.iter_mut().enumerate() {
        *slot = match group.get(i) {
            Some(&id) => id,
            None => cycle.next().copied().unwrap_or_default(),
        };
    }
    slots
}

/// Plan races so every human reaches `games_per_player` appearances (clamped to 1..=20).
///
/// Every created match gets its own round, counting up from the next free
/// round. All matches are staged on `tx`; nothing is stored until the caller commits.
pub fn plan_schedule<R: Rng + ?Sized>(
    tx: &mut UnitOfWork<'_>,
    games_per_player: i64,
    rng: &mut R,
) -> Result<Vec<GameMatch>, TournamentError> {
    let target = clamp_int(games_per_player, MIN_GAMES_PER_PLAYER, MAX_GAMES_PER_PLAYER) as usize;
    let humans = tx.tournament().humans();
    if humans.len() < MIN_GROUP {
        return Err(TournamentError::invalid(
            "Need at least 2 players to plan a schedule",
        ));
    }

    let mut slots = Vec::new();
    for p in &humans {
        let played = tx.matches().iter().filter(|m| m.involves(p.id)).count();
        let owed = target.saturating_sub(played);
        slots.extend(std::iter::repeat(p.id).take(owed));
    }
    let mut pool = AppearancePool::new(slots);
    pool.shuffle(rng);

    let headcounts = human_distribution(pool.len());
    log::debug!(
        "planning {} appearances for {} players as {:?}",
        pool.len(),
        humans.len(),
        headcounts
    );
    let groups = assemble_groups(&mut pool, &headcounts, rng);
    if !pool.is_empty() {
        log::info!(
            "{} appearance(s) could not be placed without repeating a player",
            pool.len()
        );
    }

    let bots: Vec<PlayerId> = if groups.iter().any(|g| g.len() < SLOTS) {
        ensure_bots(tx, MIN_BOTS).iter().map(|b| b.id).collect()
    } else {
        Vec::new()
    };

    let mut round = tx.tournament().next_round();
    let mut created = Vec::with_capacity(groups.len());
    for group in &groups {
        let game = GameMatch::new(round, pad_with_bots(group, &bots));
        tx.insert_match(game.clone());
        created.push(game);
        round += 1;
    }
    log::info!(
        "planned {} match(es) for tournament {}",
        created.len(),
        tx.tournament_id()
    );
    Ok(created)
}
