//! Kart tournament web app: library with models, record store and business logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;
pub mod validate;

pub use logic::{
    add_player, assemble_groups, compute_player_statistics, create_tournament, delete_player,
    delete_tournament, end_tournament, ensure_bots, find_exact_match, generate_bracket,
    generate_finals, human_distribution, is_finals_match, pad_with_bots, plan_schedule,
    record_result, rename_player, reset_matches, results, set_player_image, standings_csv,
    top_n_by_totals, totals_for_player_ids, AppearancePool, PlayerStanding, RecordOutcome,
    ResultSubmission, TournamentResults,
};
pub use models::{
    Category, GameMatch, MatchId, Player, PlayerId, PlayerKind, Tournament, TournamentError,
    TournamentId, TournamentStatus, BOT_PREFIX, SLOTS,
};
pub use store::{Store, StoreError, UnitOfWork};
