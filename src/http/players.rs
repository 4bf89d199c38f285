//! Player, team and match detail endpoints backed by the provider.

use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::cache::CompetitionNames;
use crate::config::Settings;
use crate::http::error::{ApiError, ApiResult};
use crate::provider::types::RecentMatch;
use crate::provider::{service, ProviderClient};

const DEFAULT_RECENT_LIMIT: usize = 50;

#[derive(Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

//////////////////////////////////////////////////
// Passthrough
//////////////////////////////////////////////////

/// GET /api/player/{id}
#[get("/player/{player_id}")]
pub async fn player(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    let details = client
        .player(path.into_inner(), Some("currentTeam"))
        .await
        .map_err(|e| ApiError::upstream("Failed to get player details", e))?;
    Ok(HttpResponse::Ok().json(details))
}

/// GET /api/player/{id}/matches
#[get("/player/{player_id}/matches")]
pub async fn player_matches(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    let matches = client
        .player_matches(path.into_inner())
        .await
        .map_err(|e| ApiError::upstream("Failed to get player matches", e))?;
    Ok(HttpResponse::Ok().json(matches))
}

/// GET /api/match/{id}/players
#[get("/match/{match_id}/players")]
pub async fn match_players(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    let players = client
        .match_players(path.into_inner())
        .await
        .map_err(|e| ApiError::upstream("Failed to get match players", e))?;
    Ok(HttpResponse::Ok().json(players))
}

//////////////////////////////////////////////////
// Composite
//////////////////////////////////////////////////

/// GET /api/player/{id}/recent-matches?limit=
///
/// Upstream failure yields an empty list rather than an error.
#[get("/player/{player_id}/recent-matches")]
pub async fn recent_matches(
    path: web::Path<i64>,
    query: web::Query<RecentQuery>,
    client: web::Data<ProviderClient>,
    cache: web::Data<CompetitionNames>,
) -> HttpResponse {
    let player_id = path.into_inner();
    let limit = query.limit.unwrap_or(DEFAULT_RECENT_LIMIT);

    let matches: Vec<RecentMatch> =
        match service::recent_matches(&client, &cache, player_id, limit).await {
            Ok(m) => m,
            Err(e) => {
                log::warn!("recent matches for {player_id} failed: {e}");
                Vec::new()
            }
        };
    HttpResponse::Ok().json(matches)
}

/// GET /api/player/{id}/profile
#[get("/player/{player_id}/profile")]
pub async fn player_profile(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
    cache: web::Data<CompetitionNames>,
    settings: web::Data<Settings>,
) -> HttpResponse {
    let profile =
        service::player_profile(&client, &cache, path.into_inner(), &settings.seasons).await;
    HttpResponse::Ok().json(profile)
}

/// GET /api/team/{id}/profile
#[get("/team/{team_id}/profile")]
pub async fn team_profile(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    let profile = service::team_profile(&client, path.into_inner())
        .await
        .map_err(|e| ApiError::upstream("Failed to get team profile", e))?;
    Ok(HttpResponse::Ok().json(profile))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(player)
        .service(player_matches)
        .service(recent_matches)
        .service(player_profile)
        .service(match_players)
        .service(team_profile);
}
