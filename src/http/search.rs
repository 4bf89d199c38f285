use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::http::error::{ApiError, ApiResult};
use crate::provider::service::{self, SearchScope};
use crate::provider::types::PlayerSearchResult;
use crate::provider::{normalize, ProviderClient};

const MIN_QUERY_LEN: usize = 2;
const DEFAULT_SEARCH_LIMIT: usize = 10;
const MAX_SEARCH_LIMIT: usize = 50;

#[derive(Deserialize)]
pub struct SmartSearchQuery {
    pub query: String,
    #[serde(default)]
    pub search_type: SearchScope,
}

#[derive(Deserialize)]
pub struct PlayerSearchQuery {
    pub query: String,
    pub limit: Option<usize>,
}

fn check_query(q: &str) -> ApiResult<()> {
    if q.trim().chars().count() < MIN_QUERY_LEN {
        return Err(ApiError::BadRequest(format!(
            "query must be at least {MIN_QUERY_LEN} characters"
        )));
    }
    Ok(())
}

/// GET /api/search/smart?query=&search_type=all|teams|players
#[get("/search/smart")]
pub async fn smart(
    query: web::Query<SmartSearchQuery>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    check_query(&query.query)?;
    let results = service::smart_search(&client, query.query.trim(), query.search_type).await;
    Ok(HttpResponse::Ok().json(results))
}

/// GET /api/search/players?query=&limit=
///
/// Kept for older clients; an upstream failure yields an empty list.
#[get("/search/players")]
pub async fn players(
    query: web::Query<PlayerSearchQuery>,
    client: web::Data<ProviderClient>,
) -> ApiResult<HttpResponse> {
    check_query(&query.query)?;
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    if limit > MAX_SEARCH_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "limit must be at most {MAX_SEARCH_LIMIT}"
        )));
    }

    let today = Utc::now().date_naive();
    let found: Vec<PlayerSearchResult> = match client.search_players(query.query.trim(), None).await {
        Ok(raw) => raw
            .into_iter()
            .take(limit)
            .map(|p| normalize::search_player(p, today))
            .collect(),
        Err(e) => {
            log::warn!("player search for {:?} failed: {e}", query.query);
            Vec::new()
        }
    };
    Ok(HttpResponse::Ok().json(found))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(smart).service(players);
}
