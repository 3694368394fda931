//! Single binary web server: JSON API for tournaments, uploaded pictures under /uploads.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default; see `kart_tournament_web::config` for the
//! environment variables (HOST, PORT, UPLOAD_DIR, DATA_FILE, MAX_UPLOAD_BYTES).

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    http::StatusCode,
    web::{self, Bytes, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use kart_tournament_web::config::ServerConfig;
use kart_tournament_web::logic::RawFields;
use kart_tournament_web::validate::{is_allowed_image, stored_image_name};
use kart_tournament_web::{
    add_player, create_tournament, delete_player, delete_tournament, end_tournament,
    generate_bracket, generate_finals, plan_schedule, record_result, rename_player, reset_matches,
    results, set_player_image, standings_csv, MatchId, PlayerId, ResultSubmission, Store,
    Tournament, TournamentError, TournamentId, TournamentStatus, UnitOfWork,
};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Shared server state: the record store plus the configuration it was started with.
struct Shared {
    store: RwLock<Store>,
    config: ServerConfig,
}

type AppState = Data<Shared>;

impl Shared {
    /// Rewrite the snapshot file, if one is configured. Failures are logged, not fatal.
    fn persist(&self, store: &Store) {
        if let Some(path) = &self.config.data_file {
            if let Err(e) = store.save(path) {
                log::error!("Failed to save {}: {}", path.display(), e);
            }
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct TournamentSummary {
    id: TournamentId,
    name: String,
    status: TournamentStatus,
    created_at: DateTime<Utc>,
    players: usize,
    matches: usize,
}

impl TournamentSummary {
    fn of(t: &Tournament) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            status: t.status,
            created_at: t.created_at,
            players: t.players.iter().filter(|p| p.is_human()).count(),
            matches: t.matches.len(),
        }
    }
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct ScheduleBody {
    #[serde(default = "default_games_per_player")]
    games_per_player: i64,
}

fn default_games_per_player() -> i64 {
    3
}

/// Either four finishing positions or four direct scores. Numbers or strings are accepted.
#[derive(Deserialize)]
struct RecordResultBody {
    #[serde(default)]
    positions: Option<[serde_json::Value; 4]>,
    #[serde(default)]
    scores: Option<[serde_json::Value; 4]>,
}

fn raw_fields(values: &[serde_json::Value; 4]) -> RawFields {
    values.clone().map(|v| match v {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Deserialize)]
struct ImageQuery {
    filename: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id (e.g. /api/tournaments/{id}/players/{player_id})
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: PlayerId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let status = match e {
        TournamentError::NotFound(_) => StatusCode::NOT_FOUND,
        TournamentError::PlayerInUse | TournamentError::DuplicateFinals => StatusCode::CONFLICT,
        TournamentError::InvalidInput(_)
        | TournamentError::InvalidPositions
        | TournamentError::InvalidScores => StatusCode::BAD_REQUEST,
    };
    HttpResponse::build(status)
        .json(serde_json::json!({ "error": e.to_string(), "category": e.category() }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

/// Run `op` in a unit of work on one tournament. Commits and saves only when `op` succeeds.
fn apply<T>(
    state: &Shared,
    id: TournamentId,
    op: impl FnOnce(&mut UnitOfWork<'_>) -> Result<T, TournamentError>,
) -> Result<(T, Tournament), HttpResponse> {
    let mut store = state.store.write().map_err(|_| lock_error())?;
    let mut tx = store.begin(id).map_err(|e| error_response(&e))?;
    let value = op(&mut tx).map_err(|e| {
        log::debug!("tournament {}: {}", id, e);
        error_response(&e)
    })?;
    let tournament = tx.commit().clone();
    state.persist(&store);
    Ok((value, tournament))
}

/// Respond with the committed tournament, or the error.
fn tournament_response<T>(result: Result<(T, Tournament), HttpResponse>) -> HttpResponse {
    match result {
        Ok((_, t)) => HttpResponse::Ok().json(t),
        Err(resp) => resp,
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "kart-tournament-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// List all tournaments, oldest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let store = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let list: Vec<TournamentSummary> = store.list().into_iter().map(TournamentSummary::of).collect();
    HttpResponse::Ok().json(list)
}

/// Create a new tournament (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<NameBody>) -> HttpResponse {
    let mut store = match state.store.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let id = match create_tournament(&mut store, &body.name) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };
    state.persist(&store);
    match store.get(id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Get a tournament by id with all players and matches.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.get(path.id) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

/// Delete a tournament with its players, matches and pictures.
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let removed = {
        let mut store = match state.store.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        match delete_tournament(&mut store, path.id) {
            Ok(t) => {
                state.persist(&store);
                t
            }
            Err(e) => return error_response(&e),
        }
    };
    for image in removed.players.iter().filter_map(|p| p.image.as_deref()) {
        remove_upload(&state.config, image).await;
    }
    HttpResponse::NoContent().finish()
}

/// Add a human player.
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<NameBody>,
) -> HttpResponse {
    tournament_response(apply(&state, path.id, |tx| add_player(tx, &body.name)))
}

/// Rename a human player.
#[put("/api/tournaments/{id}/players/{player_id}")]
async fn api_rename_player(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Json<NameBody>,
) -> HttpResponse {
    tournament_response(apply(&state, path.id, |tx| {
        rename_player(tx, path.player_id, &body.name)
    }))
}

/// Delete a human player that is in no match.
#[delete("/api/tournaments/{id}/players/{player_id}")]
async fn api_delete_player(state: AppState, path: Path<TournamentPlayerPath>) -> HttpResponse {
    match apply(&state, path.id, |tx| delete_player(tx, path.player_id)) {
        Ok((removed, t)) => {
            if let Some(image) = removed.image.as_deref() {
                remove_upload(&state.config, image).await;
            }
            HttpResponse::Ok().json(t)
        }
        Err(resp) => resp,
    }
}

/// Upload or replace a player's picture. Raw body, original name in `?filename=`.
#[put("/api/tournaments/{id}/players/{player_id}/image")]
async fn api_upload_image(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    query: Query<ImageQuery>,
    body: Bytes,
) -> HttpResponse {
    if !is_allowed_image(&query.filename, &body) {
        return error_response(&TournamentError::InvalidInput(
            "Invalid image. Allowed: JPG, PNG, GIF, WEBP".to_string(),
        ));
    }
    let Some(stored) = stored_image_name(&query.filename) else {
        return error_response(&TournamentError::InvalidInput("Invalid filename".to_string()));
    };
    let target = state.config.upload_dir.join(&stored);
    if let Err(e) = tokio::fs::write(&target, &body).await {
        log::error!("Failed to write {}: {}", target.display(), e);
        return HttpResponse::InternalServerError().body("upload failed");
    }
    match apply(&state, path.id, |tx| {
        set_player_image(tx, path.player_id, stored.clone())
    }) {
        Ok((previous, t)) => {
            if let Some(old) = previous.as_deref() {
                remove_upload(&state.config, old).await;
            }
            HttpResponse::Ok().json(t)
        }
        Err(resp) => {
            remove_upload(&state.config, &stored).await;
            resp
        }
    }
}

/// Legacy bracket: one round of full four-player races.
#[post("/api/tournaments/{id}/bracket")]
async fn api_generate_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    tournament_response(apply(&state, path.id, |tx| {
        generate_bracket(tx, &mut rand::thread_rng())
    }))
}

/// Plan races until every player has `games_per_player` appearances (clamped to 1..=20).
#[post("/api/tournaments/{id}/schedule")]
async fn api_plan_schedule(
    state: AppState,
    path: Path<TournamentPath>,
    body: Option<Json<ScheduleBody>>,
) -> HttpResponse {
    let games = body
        .as_ref()
        .map(|b| b.games_per_player)
        .unwrap_or_else(default_games_per_player);
    tournament_response(apply(&state, path.id, |tx| {
        plan_schedule(tx, games, &mut rand::thread_rng())
    }))
}

/// Record a race result (positions, or legacy direct scores).
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    let submission = ResultSubmission::from_fields(
        body.positions.as_ref().map(raw_fields),
        body.scores.as_ref().map(raw_fields),
    );
    let result = apply(&state, path.id, |tx| {
        let submission = submission
            .ok_or_else(|| TournamentError::InvalidInput("Enter positions or scores".to_string()))?;
        record_result(tx, path.match_id, &submission)
    });
    match result {
        Ok((outcome, t)) => {
            HttpResponse::Ok().json(serde_json::json!({ "outcome": outcome, "tournament": t }))
        }
        Err(resp) => resp,
    }
}

/// Schedule the finals for the current top 4.
#[post("/api/tournaments/{id}/finals")]
async fn api_generate_finals(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    tournament_response(apply(&state, path.id, generate_finals))
}

/// End the tournament by hand.
#[post("/api/tournaments/{id}/end")]
async fn api_end_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    tournament_response(apply(&state, path.id, |tx| {
        end_tournament(tx);
        Ok(())
    }))
}

/// Delete all matches, keep players.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    tournament_response(apply(&state, path.id, |tx| Ok(reset_matches(tx))))
}

/// Standings and matches.
#[get("/api/tournaments/{id}/results")]
async fn api_results(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match store.get(path.id) {
        Ok(t) => HttpResponse::Ok().json(results(t)),
        Err(e) => error_response(&e),
    }
}

/// Standings as a CSV download.
#[get("/api/tournaments/{id}/results.csv")]
async fn api_results_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let store = match state.store.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let t = match store.get(path.id) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    match standings_csv(&results(t).standings) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"results-{}.csv\"", t.id),
            ))
            .body(body),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().body("export failed")
        }
    }
}

/// Best-effort removal of a stored picture.
async fn remove_upload(config: &ServerConfig, stored: &str) {
    let path = config.upload_dir.join(stored);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        log::warn!("Could not remove {}: {}", path.display(), e);
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let store = match &config.data_file {
        Some(path) => {
            let store = Store::load(path).map_err(|e| std::io::Error::other(e.to_string()))?;
            log::info!(
                "Loaded {} tournament(s) from {}",
                store.list().len(),
                path.display()
            );
            store
        }
        None => Store::new(),
    };
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let max_upload = config.max_upload_bytes;
    let upload_dir = config.upload_dir.clone();
    let state = Data::new(Shared {
        store: RwLock::new(store),
        config,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(max_upload))
            .service(api_health)
            .service(favicon)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_results_csv)
            .service(api_results)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_add_player)
            .service(api_rename_player)
            .service(api_delete_player)
            .service(api_upload_image)
            .service(api_generate_bracket)
            .service(api_plan_schedule)
            .service(api_record_result)
            .service(api_generate_finals)
            .service(api_end_tournament)
            .service(api_reset_matches)
            .service(Files::new("/uploads", upload_dir.clone()))
    })
    .bind(bind)?
    .run()
    .await
}
