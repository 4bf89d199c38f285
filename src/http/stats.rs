//! Raw provider resources exposed as-is: advanced stats, seasons, formations.
//!
//! Every handler here is a plain passthrough; any upstream failure is a 500.

use actix_web::{get, web, HttpResponse};
use serde_json::Value;

use crate::http::error::{ApiError, ApiResult};
use crate::provider::{ProviderClient, ProviderResult};

fn passthrough(res: ProviderResult<Value>, what: &'static str) -> ApiResult<HttpResponse> {
    res.map(|v| HttpResponse::Ok().json(v))
        .map_err(|e| ApiError::upstream(what, e))
}

/// GET /api/player/{id}/advanced-stats
#[get("/player/{player_id}/advanced-stats")]
pub async fn player_advanced_stats(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    passthrough(
        client.player_advanced_stats(path.into_inner()).await,
        "Failed to get player stats",
    )
}

/// GET /api/team/{id}/advanced-stats
#[get("/team/{team_id}/advanced-stats")]
pub async fn team_advanced_stats(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    passthrough(
        client.team_advanced_stats(path.into_inner()).await,
        "Failed to get team stats",
    )
}

/// GET /api/team/{id}/career
#[get("/team/{team_id}/career")]
pub async fn team_career(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    passthrough(
        client.team_career(path.into_inner()).await,
        "Failed to get team career",
    )
}

/// GET /api/match/{id}
#[get("/match/{match_id}")]
pub async fn match_detail(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    passthrough(
        client.match_detail(path.into_inner(), None).await,
        "Failed to get match",
    )
}

/// GET /api/match/{id}/formations
#[get("/match/{match_id}/formations")]
pub async fn match_formations(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    passthrough(
        client.match_formations(path.into_inner()).await,
        "Failed to get match formations",
    )
}

/// GET /api/match/{id}/advanced-stats
#[get("/match/{match_id}/advanced-stats")]
pub async fn match_advanced_stats(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    passthrough(
        client.match_advanced_stats(path.into_inner()).await,
        "Failed to get match stats",
    )
}

/// GET /api/competitions/{id}/players
#[get("/competitions/{competition_id}/players")]
pub async fn competition_players(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    passthrough(
        client.competition_players(path.into_inner()).await,
        "Failed to get competition players",
    )
}

//////////////////////////////////////////////////
// Seasons
//////////////////////////////////////////////////

/// GET /api/seasons/{id}/matches
#[get("/seasons/{season_id}/matches")]
pub async fn season_matches(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    passthrough(
        client.season_matches(path.into_inner()).await,
        "Failed to get season matches",
    )
}

/// GET /api/seasons/{id}/players
#[get("/seasons/{season_id}/players")]
pub async fn season_players(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    passthrough(
        client.season_players(path.into_inner()).await,
        "Failed to get season players",
    )
}

/// GET /api/seasons/{id}/teams
#[get("/seasons/{season_id}/teams")]
pub async fn season_teams(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    passthrough(
        client.season_teams(path.into_inner()).await,
        "Failed to get season teams",
    )
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(player_advanced_stats)
        .service(team_advanced_stats)
        .service(team_career)
        .service(match_detail)
        .service(match_formations)
        .service(match_advanced_stats)
        .service(competition_players)
        .service(season_matches)
        .service(season_players)
        .service(season_teams);
}
