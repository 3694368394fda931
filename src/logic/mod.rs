//! Tournament business logic: roster, schedule planning, scoring, standings, finals.

mod bracket;
mod distribution;
mod finals;
mod lifecycle;
mod roster;
mod schedule;
mod scoring;
mod standings;

pub use bracket::generate_bracket;
pub use distribution::human_distribution;
pub use finals::{
    find_exact_match, generate_finals, is_finals_match, top_four_ids, top_n_by_totals,
    totals_for_player_ids,
};
pub use lifecycle::{create_tournament, delete_tournament, end_tournament, reset_matches};
pub use roster::{
    add_player, delete_player, ensure_bots, player_in_any_match, rename_player, set_player_image,
};
pub use schedule::{
    assemble_groups, pad_with_bots, plan_schedule, AppearancePool, MAX_GAMES_PER_PLAYER,
    MIN_BOTS, MIN_GAMES_PER_PLAYER,
};
pub use scoring::{
    record_result, RawFields, RecordOutcome, ResultSubmission, MAX_SCORE, MIN_SCORE,
    POSITION_POINTS,
};
pub use standings::{
    compute_player_statistics, results, standings_csv, PlayerStanding, ResultsHeader,
    TournamentResults,
};
