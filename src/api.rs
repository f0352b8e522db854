//! REST API: JSON views, error mapping and actix-web handlers.
//!
//! Mounted by `bin/web.rs` through [`configure`].

use crate::logic::{
    build_bracket, match_schedule, podium, register_competitor, register_match_result,
    BuildError, ResultError, StandingsError, TopologyError,
};
use crate::models::{
    Bracket, Competitor, CompetitorId, LabelError, Match, MatchId, Tournament, TournamentError,
    TournamentId,
};
use crate::store::Store;
use actix_web::{
    get,
    http::StatusCode,
    post,
    web::{self, Data, Json, Path},
    HttpResponse, ResponseError,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Shared application state: the store plus the random source used to seat competitors.
pub struct AppState {
    pub store: Store,
    rng: Mutex<StdRng>,
}

impl AppState {
    pub fn new(rng: StdRng) -> Self {
        Self {
            store: Store::new(),
            rng: Mutex::new(rng),
        }
    }
}

type State = Data<AppState>;

/// Every failure a handler can report, with its HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Target {0} does not exist")]
    NotFound(&'static str),
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error(transparent)]
    Tournament(#[from] TournamentError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Result(#[from] ResultError),
    #[error(transparent)]
    Standings(#[from] StandingsError),
}

fn tournament_status(e: &TournamentError) -> StatusCode {
    match e {
        TournamentError::AlreadyStarted
        | TournamentError::AlreadyRegistered(_)
        | TournamentError::ImmutableAfterStart { .. } => StatusCode::CONFLICT,
        TournamentError::NotStarted | TournamentError::InvalidCompetitorCount => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Label(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Tournament(e) => tournament_status(e),
            ApiError::Build(e) => match e {
                BuildError::NoCompetitors => StatusCode::UNPROCESSABLE_ENTITY,
                BuildError::AlreadyScheduled(_) => StatusCode::CONFLICT,
                BuildError::Tournament(e) => tournament_status(e),
                BuildError::Topology(TopologyError::NoCompetitors) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                BuildError::Topology(_) | BuildError::Slot(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Result(e) => match e {
                ResultError::MatchNotFound(_) => StatusCode::NOT_FOUND,
                ResultError::AlreadyRegistered
                | ResultError::ShouldHaveAutomaticWinner
                | ResultError::NotAMatchCompetitor => StatusCode::CONFLICT,
                ResultError::MissingCompetitor | ResultError::NotStarted => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                ResultError::MissingBracketMatch { .. }
                | ResultError::UnknownParticipant(_)
                | ResultError::SlotConflict(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Standings(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "detail": self.to_string() }))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CompetitorView {
    pub uuid: Uuid,
    pub label: String,
}

impl From<&Competitor> for CompetitorView {
    fn from(c: &Competitor) -> Self {
        Self {
            uuid: c.id,
            label: c.label.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentView {
    pub uuid: Uuid,
    pub label: String,
    pub number_competitors: Option<usize>,
    pub starting_round: Option<u32>,
    pub started_at: Option<DateTime<Utc>>,
}

impl From<&Tournament> for TournamentView {
    fn from(t: &Tournament) -> Self {
        let start = t.started();
        Self {
            uuid: t.id,
            label: t.label.clone(),
            number_competitors: start.map(|s| s.competitor_count),
            starting_round: start.map(|s| s.starting_round),
            started_at: start.map(|s| s.started_at),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub uuid: Uuid,
    pub round: u32,
    pub position: u32,
    pub competitor_a: Option<CompetitorView>,
    pub competitor_b: Option<CompetitorView>,
    pub winner: Option<CompetitorView>,
    pub loser: Option<CompetitorView>,
}

/// A match on its own, with the tournament it belongs to.
#[derive(Clone, Debug, Serialize)]
pub struct MatchDetailView {
    #[serde(flatten)]
    pub summary: MatchView,
    pub tournament: TournamentView,
}

fn competitor_view(store: &Store, id: Option<CompetitorId>) -> Option<CompetitorView> {
    id.and_then(|id| store.competitor(id)).map(|c| CompetitorView::from(&c))
}

fn match_view(store: &Store, m: &Match) -> MatchView {
    MatchView {
        uuid: m.id,
        round: m.round,
        position: m.position,
        competitor_a: competitor_view(store, m.slot_a),
        competitor_b: competitor_view(store, m.slot_b),
        winner: competitor_view(store, m.winner()),
        loser: competitor_view(store, m.loser()),
    }
}

fn match_detail_view(store: &Store, bracket: &Bracket, m: &Match) -> MatchDetailView {
    MatchDetailView {
        summary: match_view(store, m),
        tournament: TournamentView::from(&bracket.tournament),
    }
}

#[derive(Deserialize)]
struct LabelBody {
    label: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterCompetitorBody {
    competitor_uuid: CompetitorId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WinnerBody {
    winner_uuid: CompetitorId,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segment: competitor id (e.g. /api/competitors/{id})
#[derive(Deserialize)]
struct CompetitorPath {
    id: CompetitorId,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[get("/api/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "knockout-tournament-web",
    })
}

/// Create a competitor. Labels are trimmed and may repeat.
#[post("/api/competitors")]
async fn api_create_competitor(state: State, body: Json<LabelBody>) -> Result<HttpResponse, ApiError> {
    let competitor = Competitor::new(&body.label)?;
    let view = CompetitorView::from(&competitor);
    state.store.insert_competitor(competitor);
    Ok(HttpResponse::Created().json(view))
}

#[get("/api/competitors")]
async fn api_list_competitors(state: State) -> HttpResponse {
    let competitors: Vec<CompetitorView> = state
        .store
        .competitors()
        .iter()
        .map(CompetitorView::from)
        .collect();
    HttpResponse::Ok().json(serde_json::json!({ "competitors": competitors }))
}

#[get("/api/competitors/{id}")]
async fn api_get_competitor(state: State, path: Path<CompetitorPath>) -> Result<HttpResponse, ApiError> {
    let competitor = state
        .store
        .competitor(path.id)
        .ok_or(ApiError::NotFound("Competitor"))?;
    Ok(HttpResponse::Ok().json(CompetitorView::from(&competitor)))
}

/// Create an unstarted tournament.
#[post("/api/tournaments")]
async fn api_create_tournament(state: State, body: Json<LabelBody>) -> Result<HttpResponse, ApiError> {
    let tournament = Tournament::new(&body.label)?;
    let view = TournamentView::from(&tournament);
    state.store.insert_tournament(tournament);
    Ok(HttpResponse::Created().json(view))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: State, path: Path<TournamentPath>) -> Result<HttpResponse, ApiError> {
    let bracket = state
        .store
        .bracket(path.id)
        .ok_or(ApiError::NotFound("Tournament"))?;
    Ok(HttpResponse::Ok().json(TournamentView::from(&bracket.tournament)))
}

/// Register a competitor (tournament must not have started).
#[post("/api/tournaments/{id}/competitors")]
async fn api_register_competitor(
    state: State,
    path: Path<TournamentPath>,
    body: Json<RegisterCompetitorBody>,
) -> Result<HttpResponse, ApiError> {
    let competitor = state
        .store
        .competitor(body.competitor_uuid)
        .ok_or(ApiError::NotFound("Competitor"))?;
    let tournament = state
        .store
        .update(path.id, |bracket| {
            register_competitor(bracket, competitor.id)?;
            Ok::<_, TournamentError>(TournamentView::from(&bracket.tournament))
        })
        .ok_or(ApiError::NotFound("Tournament"))??;
    Ok(HttpResponse::Created().json(serde_json::json!({
        "tournament": tournament,
        "competitor": CompetitorView::from(&competitor),
    })))
}

/// Start the tournament: generate the full bracket.
///
/// The shared generator only hands out a seed; the shuffle itself runs on a
/// per-call generator so starts of different tournaments never wait on each other.
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: State, path: Path<TournamentPath>) -> Result<HttpResponse, ApiError> {
    let seed: u64 = state.rng.lock().gen();
    let mut rng = StdRng::seed_from_u64(seed);
    let bracket = state
        .store
        .update(path.id, |bracket| {
            build_bracket(bracket, &mut rng, Utc::now())?;
            Ok::<_, BuildError>(bracket.clone())
        })
        .ok_or(ApiError::NotFound("Tournament"))??;

    let store = &state.store;
    let competitors: Vec<CompetitorView> = bracket
        .participations
        .iter()
        .filter_map(|p| competitor_view(store, Some(p.competitor_id)))
        .collect();
    let matches: Vec<MatchView> = bracket.matches.iter().map(|m| match_view(store, m)).collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "tournament": TournamentView::from(&bracket.tournament),
        "competitors": competitors,
        "matches": matches,
    })))
}

/// Played and playable matches of a started tournament.
#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: State, path: Path<TournamentPath>) -> Result<HttpResponse, ApiError> {
    let bracket = state
        .store
        .bracket(path.id)
        .ok_or(ApiError::NotFound("Tournament"))?;
    let schedule = match_schedule(&bracket)?;
    let store = &state.store;
    let past: Vec<MatchView> = schedule.past.iter().map(|m| match_view(store, m)).collect();
    let upcoming: Vec<MatchView> = schedule.upcoming.iter().map(|m| match_view(store, m)).collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "tournament": TournamentView::from(&bracket.tournament),
        "past": past,
        "upcoming": upcoming,
    })))
}

/// Podium of a finished tournament.
#[get("/api/tournaments/{id}/result")]
async fn api_tournament_result(state: State, path: Path<TournamentPath>) -> Result<HttpResponse, ApiError> {
    let bracket = state
        .store
        .bracket(path.id)
        .ok_or(ApiError::NotFound("Tournament"))?;
    let top4: Vec<CompetitorView> = podium(&bracket)?
        .into_iter()
        .filter_map(|id| competitor_view(&state.store, Some(id)))
        .collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "tournament": TournamentView::from(&bracket.tournament),
        "top4": top4,
    })))
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: State, path: Path<MatchPath>) -> Result<HttpResponse, ApiError> {
    let bracket = state
        .store
        .tournament_of_match(path.id)
        .and_then(|t| state.store.bracket(t))
        .ok_or(ApiError::NotFound("Match"))?;
    let m = bracket.find_match(path.id).ok_or(ApiError::NotFound("Match"))?;
    Ok(HttpResponse::Ok().json(match_detail_view(&state.store, &bracket, m)))
}

/// Register the winner of a match.
#[post("/api/matches/{id}")]
async fn api_register_match_result(
    state: State,
    path: Path<MatchPath>,
    body: Json<WinnerBody>,
) -> Result<HttpResponse, ApiError> {
    let tournament_id = state
        .store
        .tournament_of_match(path.id)
        .ok_or(ApiError::NotFound("Match"))?;
    let (bracket, m) = state
        .store
        .update(tournament_id, |bracket| {
            let m = register_match_result(bracket, path.id, body.winner_uuid, Utc::now())?.clone();
            Ok::<_, ResultError>((bracket.clone(), m))
        })
        .ok_or(ApiError::NotFound("Match"))??;
    Ok(HttpResponse::Ok().json(match_detail_view(&state.store, &bracket, &m)))
}

/// Mount every route on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_competitor)
        .service(api_list_competitors)
        .service(api_get_competitor)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_register_competitor)
        .service(api_start_tournament)
        .service(api_list_matches)
        .service(api_tournament_result)
        .service(api_get_match)
        .service(api_register_match_result);
}
