//! Integration tests for schedule planning: headcounts, group assembly, bot padding, bracket mode.

use kart_tournament_web::{
    add_player, assemble_groups, create_tournament, generate_bracket, human_distribution,
    pad_with_bots, plan_schedule, AppearancePool, GameMatch, PlayerId, Store, Tournament,
    TournamentError, TournamentId, SLOTS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

fn tournament_with_players(n: usize) -> (Store, TournamentId, Vec<PlayerId>) {
    let mut store = Store::new();
    let id = create_tournament(&mut store, "Kart Cup").unwrap();
    let mut tx = store.begin(id).unwrap();
    let ids = (0..n)
        .map(|i| add_player(&mut tx, &format!("P{i}")).unwrap())
        .collect();
    tx.commit();
    (store, id, ids)
}

/// Appearances per human across all matches.
fn appearances(t: &Tournament) -> HashMap<PlayerId, usize> {
    let mut counts: HashMap<PlayerId, usize> = t.humans().iter().map(|p| (p.id, 0)).collect();
    for m in &t.matches {
        for id in m.players {
            if let Some(c) = counts.get_mut(&id) {
                *c += 1;
            }
        }
    }
    counts
}

fn assert_valid_matches(t: &Tournament) {
    let humans: HashSet<PlayerId> = t.humans().iter().map(|p| p.id).collect();
    for m in &t.matches {
        assert_eq!(m.players.len(), SLOTS);
        assert!(m.players.iter().all(|id| t.player(*id).is_some()));
        let seated: Vec<PlayerId> = m.players.iter().copied().filter(|id| humans.contains(id)).collect();
        let distinct: HashSet<PlayerId> = seated.iter().copied().collect();
        assert_eq!(seated.len(), distinct.len(), "human repeated in {:?}", m.players);
        assert!(seated.len() >= 2);
    }
}

#[test]
fn distribution_examples() {
    assert_eq!(human_distribution(0), Vec::<u32>::new());
    assert_eq!(human_distribution(1), Vec::<u32>::new());
    assert_eq!(human_distribution(2), vec![2]);
    assert_eq!(human_distribution(3), vec![3]);
    assert_eq!(human_distribution(4), vec![4]);
    assert_eq!(human_distribution(5), vec![2, 3]);
    assert_eq!(human_distribution(6), vec![3, 3]);
    assert_eq!(human_distribution(9), vec![3, 3, 3]);
    assert_eq!(human_distribution(10), vec![4, 3, 3]);
}

#[test]
fn distribution_sums_and_never_has_a_lonely_human() {
    for total in 2..200 {
        let counts = human_distribution(total);
        assert_eq!(counts.iter().sum::<u32>() as usize, total, "total {total}");
        assert!(counts.iter().all(|c| (2..=4).contains(c)), "total {total}: {counts:?}");
        assert!(
            !(counts.contains(&2) && counts.contains(&4)),
            "total {total}: {counts:?} still mixes 2 and 4"
        );
        assert_eq!(counts.len(), total.div_ceil(4), "total {total}: not minimal");
    }
}

#[test]
fn take_distinct_scans_left_to_right_and_skips_repeats() {
    let [a, b, c, d] = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
    let mut pool = AppearancePool::new(vec![a, a, b, c, b, d]);

    assert_eq!(pool.take_distinct(3), vec![a, b, c]);
    assert_eq!(pool.as_slice(), &[a, b, d]);
    assert_eq!(pool.take_distinct(4), vec![a, b, d]);
    assert!(pool.is_empty());
}

#[test]
fn assemble_gives_up_when_only_one_player_is_left() {
    let a = Uuid::new_v4();
    let mut pool = AppearancePool::new(vec![a, a, a]);
    let mut rng = StdRng::seed_from_u64(7);
    let groups = assemble_groups(&mut pool, &human_distribution(3), &mut rng);
    assert!(groups.is_empty());
    assert_eq!(pool.len(), 3);
}

#[test]
fn assemble_drains_leftovers_in_threes() {
    let ids: Vec<PlayerId> = (0..5).map(|_| Uuid::new_v4()).collect();
    let mut pool = AppearancePool::new(ids.clone());
    let mut rng = StdRng::seed_from_u64(1);
    // headcounts cover only 2 of the 5 appearances
    let groups = assemble_groups(&mut pool, &[2], &mut rng);
    let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
    assert_eq!(sizes, [2, 3]);
    assert!(pool.is_empty());
}

#[test]
fn padding_cycles_through_bots() {
    let humans: Vec<PlayerId> = (0..2).map(|_| Uuid::new_v4()).collect();
    let bots: Vec<PlayerId> = (0..2).map(|_| Uuid::new_v4()).collect();
    assert_eq!(
        pad_with_bots(&humans, &bots),
        [humans[0], humans[1], bots[0], bots[1]]
    );
    let one_bot = [bots[0]];
    assert_eq!(
        pad_with_bots(&humans, &one_bot),
        [humans[0], humans[1], bots[0], bots[0]]
    );
    let full: Vec<PlayerId> = (0..4).map(|_| Uuid::new_v4()).collect();
    assert_eq!(pad_with_bots(&full, &[]), [full[0], full[1], full[2], full[3]]);
}

#[test]
fn four_players_one_game_needs_no_bots() {
    let (mut store, id, ids) = tournament_with_players(4);
    let mut tx = store.begin(id).unwrap();
    let created = plan_schedule(&mut tx, 1, &mut StdRng::seed_from_u64(3)).unwrap();
    let t = tx.commit();

    assert_eq!(created.len(), 1);
    assert_eq!(created[0].round, 1);
    let everyone: HashSet<PlayerId> = ids.iter().copied().collect();
    assert_eq!(created[0].player_set(), everyone);
    assert!(t.bots().is_empty());
}

#[test]
fn three_players_are_padded_with_a_bot() {
    let (mut store, id, _) = tournament_with_players(3);
    let mut tx = store.begin(id).unwrap();
    let created = plan_schedule(&mut tx, 1, &mut StdRng::seed_from_u64(3)).unwrap();
    let t = tx.commit();

    let bots = t.bots();
    assert_eq!(bots.len(), 2);
    assert_eq!(bots[0].name, "[BOT] 1");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].players[3], bots[0].id);
    assert_valid_matches(t);
}

#[test]
fn every_match_gets_its_own_round() {
    let (mut store, id, _) = tournament_with_players(4);
    let mut tx = store.begin(id).unwrap();
    let created = plan_schedule(&mut tx, 2, &mut StdRng::seed_from_u64(11)).unwrap();
    let rounds: Vec<u32> = created.iter().map(|m| m.round).collect();
    assert_eq!(rounds, [1, 2]);
    let t = tx.commit();
    assert!(appearances(t).values().all(|&n| n == 2));

    // everyone already has 2 games: nothing left to plan
    let mut tx = store.begin(id).unwrap();
    let again = plan_schedule(&mut tx, 2, &mut StdRng::seed_from_u64(12)).unwrap();
    assert!(again.is_empty());

    // one more each continues after the last round
    let more = plan_schedule(&mut tx, 3, &mut StdRng::seed_from_u64(13)).unwrap();
    assert_eq!(more.len(), 1);
    assert_eq!(more[0].round, 3);
}

#[test]
fn schedule_respects_games_per_player_for_many_seeds() {
    for seed in 0..40 {
        for players in 2..=11 {
            let (mut store, id, _) = tournament_with_players(players);
            let mut tx = store.begin(id).unwrap();
            plan_schedule(&mut tx, 3, &mut StdRng::seed_from_u64(seed)).unwrap();
            let t = tx.commit();
            assert_valid_matches(t);
            assert!(appearances(t).values().all(|&n| n <= 3));
            let rounds: HashSet<u32> = t.matches.iter().map(|m| m.round).collect();
            assert_eq!(rounds.len(), t.matches.len());
        }
    }
}

#[test]
fn games_per_player_is_clamped() {
    let (mut store, id, _) = tournament_with_players(4);
    let mut tx = store.begin(id).unwrap();
    plan_schedule(&mut tx, 0, &mut StdRng::seed_from_u64(5)).unwrap();
    assert!(appearances(tx.tournament()).values().all(|&n| n == 1));

    plan_schedule(&mut tx, 500, &mut StdRng::seed_from_u64(5)).unwrap();
    assert!(appearances(tx.tournament()).values().all(|&n| n == 20));
}

#[test]
fn schedule_needs_two_players() {
    let (mut store, id, _) = tournament_with_players(1);
    let mut tx = store.begin(id).unwrap();
    assert!(matches!(
        plan_schedule(&mut tx, 2, &mut StdRng::seed_from_u64(0)),
        Err(TournamentError::InvalidInput(_))
    ));
}

#[test]
fn dropped_plan_commits_nothing() {
    let (mut store, id, _) = tournament_with_players(3);
    {
        let mut tx = store.begin(id).unwrap();
        plan_schedule(&mut tx, 4, &mut StdRng::seed_from_u64(9)).unwrap();
        assert!(!tx.matches().is_empty());
    }
    let t = store.get(id).unwrap();
    assert!(t.matches.is_empty());
    assert!(t.bots().is_empty());
}

#[test]
fn bracket_chunks_shuffled_players_into_fours() {
    let (mut store, id, _) = tournament_with_players(6);
    let mut tx = store.begin(id).unwrap();
    let created = generate_bracket(&mut tx, &mut StdRng::seed_from_u64(2)).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].round, 1);
    assert_eq!(created[0].player_set().len(), 4);
}

#[test]
fn bracket_later_rounds_split_top_and_bottom() {
    let (mut store, id, ids) = tournament_with_players(8);
    let mut tx = store.begin(id).unwrap();
    let mut top = GameMatch::new(1, [ids[0], ids[1], ids[2], ids[3]]);
    top.scores = [Some(10), Some(9), Some(8), Some(7)];
    top.winner = Some(ids[0]);
    let mut bottom = GameMatch::new(1, [ids[4], ids[5], ids[6], ids[7]]);
    bottom.scores = [Some(4), Some(3), Some(2), Some(1)];
    bottom.winner = Some(ids[4]);
    tx.insert_match(top);
    tx.insert_match(bottom);

    let created = generate_bracket(&mut tx, &mut StdRng::seed_from_u64(4)).unwrap();
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|m| m.round == 2));
    let expected_top: HashSet<PlayerId> = ids[..4].iter().copied().collect();
    let expected_bottom: HashSet<PlayerId> = ids[4..].iter().copied().collect();
    assert_eq!(created[0].player_set(), expected_top);
    assert_eq!(created[1].player_set(), expected_bottom);
}

#[test]
fn bracket_needs_four_players() {
    let (mut store, id, _) = tournament_with_players(3);
    let mut tx = store.begin(id).unwrap();
    assert!(matches!(
        generate_bracket(&mut tx, &mut StdRng::seed_from_u64(0)),
        Err(TournamentError::InvalidInput(_))
    ));
}
