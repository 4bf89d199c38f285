//! Browse the provider catalogue: areas → competitions → teams → players.

use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::http::error::{ApiError, ApiResult};
use crate::provider::{normalize, ProviderClient};

const DEFAULT_MATCH_LIMIT: usize = 20;
const MAX_MATCH_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct MatchesQuery {
    pub limit: Option<usize>,
}

/// GET /api/areas
#[get("/areas")]
pub async fn areas(client: web::Data<ProviderClient>) -> ApiResult<HttpResponse> {
    let raw = client
        .areas()
        .await
        .map_err(|e| ApiError::upstream("Failed to get areas", e))?;
    Ok(HttpResponse::Ok().json(normalize::areas(raw)))
}

/// GET /api/areas/{id}/competitions
///
/// The provider addresses competitions by the area's alpha-3 code, so the
/// area list is fetched first to translate the numeric id.
#[get("/areas/{area_id}/competitions")]
pub async fn area_competitions(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    let area_id = path.into_inner();
    let area_list = client
        .areas()
        .await
        .map_err(|e| ApiError::upstream("Failed to get competitions", e))?;

    let Some((code, name)) = area_list
        .into_iter()
        .find(|a| a.id == Some(area_id))
        .and_then(|a| Some((a.alpha3code?, a.name.unwrap_or_else(|| normalize::UNKNOWN.into()))))
    else {
        return Err(ApiError::NotFound("Area not found".into()));
    };

    let raw = client
        .competitions(&code)
        .await
        .map_err(|e| ApiError::upstream("Failed to get competitions", e))?;
    Ok(HttpResponse::Ok().json(normalize::competitions(raw.competitions, &name)))
}

/// GET /api/competitions/{id}/teams
#[get("/competitions/{competition_id}/teams")]
pub async fn competition_teams(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    let raw = client
        .competition_teams(path.into_inner())
        .await
        .map_err(|e| ApiError::upstream("Failed to get teams", e))?;
    Ok(HttpResponse::Ok().json(normalize::teams(raw.teams)))
}

/// GET /api/competitions/{id}/matches?limit=
#[get("/competitions/{competition_id}/matches")]
pub async fn competition_matches(
    path: web::Path<i64>,
    query: web::Query<MatchesQuery>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_MATCH_LIMIT);
    if limit > MAX_MATCH_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "limit must be at most {MAX_MATCH_LIMIT}"
        )));
    }

    let raw = client
        .competition_matches(path.into_inner())
        .await
        .map_err(|e| ApiError::upstream("Failed to get matches", e))?;
    Ok(HttpResponse::Ok().json(normalize::matches(raw, limit)))
}

/// GET /api/teams/{id}/players
#[get("/teams/{team_id}/players")]
pub async fn team_players(
    path: web::Path<i64>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    let raw = client
        .team_squad(path.into_inner())
        .await
        .map_err(|e| ApiError::upstream("Failed to get team players", e))?;
    Ok(HttpResponse::Ok().json(normalize::squad(raw, Utc::now().date_naive())))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(areas)
        .service(area_competitions)
        .service(competition_teams)
        .service(competition_matches)
        .service(team_players);
}
