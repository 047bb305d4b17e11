//! Single binary JSON host for the bracket engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, INACTIVITY_HOURS.

use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_engine::{
    delete_bracket, import_participants, standings, start_match, BracketError, Format, MatchRef,
    Participant, ParticipantId, ParticipantStatus, SeedingMethod, Tournament, TournamentId,
    TournamentRegistry,
};
use serde::Deserialize;
use std::time::Duration;

type AppState = Data<TournamentRegistry>;

/// How often idle tournaments are purged.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(30 * 60);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    format: Format,
    #[serde(default = "default_best_of")]
    best_of: u32,
}

fn default_best_of() -> u32 {
    3
}

#[derive(Deserialize)]
struct AddParticipantBody {
    /// Generated when absent.
    id: Option<ParticipantId>,
    seed: Option<u32>,
}

#[derive(Deserialize)]
struct SetStatusBody {
    status: ParticipantStatus,
}

#[derive(Deserialize)]
struct GenerateBody {
    #[serde(default)]
    method: SeedingMethod,
    expected_revision: Option<u64>,
}

#[derive(Deserialize)]
struct MatchBody {
    #[serde(rename = "match")]
    match_ref: MatchRef,
}

#[derive(Deserialize)]
struct SubmitResultBody {
    revision: Option<u64>,
    #[serde(rename = "match")]
    match_ref: MatchRef,
    winner: ParticipantId,
    team_1_score: i32,
    team_2_score: i32,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and participant id
#[derive(Deserialize)]
struct TournamentParticipantPath {
    id: TournamentId,
    participant_id: ParticipantId,
}

/// Map engine errors onto HTTP status codes.
fn error_response(e: BracketError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        BracketError::TournamentNotFound(_)
        | BracketError::MatchNotFound(_)
        | BracketError::ParticipantNotFound(_) => HttpResponse::NotFound().json(body),
        BracketError::MatchAlreadyDecided(_)
        | BracketError::StaleBracket { .. }
        | BracketError::ResultsRecorded
        | BracketError::BracketExists
        | BracketError::DuplicateParticipant(_) => HttpResponse::Conflict().json(body),
        BracketError::LockPoisoned => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn respond<T: serde::Serialize>(result: Result<T, BracketError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-engine",
    })
}

/// Create a new tournament (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Option<Json<CreateTournamentBody>>) -> HttpResponse {
    let tournament = match body {
        Some(b) => Tournament::new(b.name.trim(), b.format, b.best_of),
        None => Tournament::new("", Format::default(), default_best_of()),
    };
    let snapshot = tournament.clone();
    respond(state.insert(tournament).map(|_| snapshot))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.snapshot(path.id))
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.remove(path.id).map(|()| serde_json::json!({ "ok": true })))
}

/// Register one participant.
#[post("/api/tournaments/{id}/participants")]
async fn api_add_participant(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddParticipantBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut participant = Participant::new(body.id.unwrap_or_else(ParticipantId::random));
    participant.seed = body.seed;
    respond(state.with_tournament(path.id, |t| {
        t.add_participant(participant)?;
        Ok(t.clone())
    }))
}

/// Import participants from a CSV body (`id,seed,status`).
#[post("/api/tournaments/{id}/participants/import")]
async fn api_import_participants(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    respond(state.with_tournament(path.id, |t| {
        import_participants(t, body.as_bytes())?;
        Ok(t.clone())
    }))
}

#[put("/api/tournaments/{id}/participants/{participant_id}/status")]
async fn api_set_participant_status(
    state: AppState,
    path: Path<TournamentParticipantPath>,
    body: Json<SetStatusBody>,
) -> HttpResponse {
    respond(state.with_tournament(path.id, |t| {
        t.set_participant_status(&path.participant_id, body.status)?;
        Ok(t.clone())
    }))
}

/// Seed and build the bracket (full replace of any previous one).
#[post("/api/tournaments/{id}/bracket")]
async fn api_generate_bracket(
    state: AppState,
    path: Path<TournamentPath>,
    body: Option<Json<GenerateBody>>,
) -> HttpResponse {
    let (method, expected_revision) = body
        .map(|b| (b.method, b.expected_revision))
        .unwrap_or_default();
    respond(state.generate(path.id, method, expected_revision))
}

#[delete("/api/tournaments/{id}/bracket")]
async fn api_delete_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.with_tournament(path.id, |t| {
        delete_bracket(t)?;
        Ok(t.clone())
    }))
}

#[post("/api/tournaments/{id}/matches/start")]
async fn api_start_match(state: AppState, path: Path<TournamentPath>, body: Json<MatchBody>) -> HttpResponse {
    respond(state.with_tournament(path.id, |t| {
        let bracket = t.bracket.as_mut().ok_or(BracketError::NoBracket)?;
        start_match(bracket, &body.match_ref)?;
        let m = bracket.get(&body.match_ref).cloned();
        t.touch();
        Ok(m)
    }))
}

/// Submit a result; the response lists changed and newly playable matches.
#[post("/api/tournaments/{id}/matches/result")]
async fn api_submit_result(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<SubmitResultBody>,
) -> HttpResponse {
    let b = body.into_inner();
    respond(state.submit(
        path.id,
        b.revision,
        &b.match_ref,
        &b.winner,
        b.team_1_score,
        b.team_2_score,
    ))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(state.with_tournament(path.id, |t| {
        let bracket = t.bracket.as_ref().ok_or(BracketError::NoBracket)?;
        Ok(serde_json::json!({
            "champion": bracket.champion(),
            "standings": standings(bracket),
        }))
    }))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_inactivity_hours() -> i64 {
    12
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let inactivity_hours: i64 = std::env::var("INACTIVITY_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_inactivity_hours);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(TournamentRegistry::new());

    // Background task: periodically remove tournaments that have been idle too long
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match state_cleanup.purge_inactive(chrono::Duration::hours(inactivity_hours)) {
                Ok(0) => {}
                Ok(removed) => log::info!(
                    "Cleaned up {} inactive tournament(s) (no activity for {}h)",
                    removed,
                    inactivity_hours
                ),
                Err(e) => log::warn!("Cleanup skipped: {}", e),
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_add_participant)
            .service(api_import_participants)
            .service(api_set_participant_status)
            .service(api_generate_bracket)
            .service(api_delete_bracket)
            .service(api_start_match)
            .service(api_submit_result)
            .service(api_standings)
            .route("/", web::get().to(|| async { HttpResponse::Ok().body("bracket-engine") }))
    })
    .bind(bind)?
    .run()
    .await
}
