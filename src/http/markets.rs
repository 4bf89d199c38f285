use actix_web::{get, patch, post, web, HttpResponse};
use uuid::Uuid;

use crate::db::models::{Market, MarketPatch, MarketPlayer, MarketPlayerPatch, NewMarket, NewMarketPlayer};
use crate::db::{market_repo, Datastore, Visibility};
use crate::http::auth::CurrentUser;
use crate::http::error::{ApiError, ApiResult};

fn market_not_found() -> ApiError {
    ApiError::NotFound("Market not found".into())
}

/// GET /api/markets
#[get("/markets")]
pub async fn list(user: CurrentUser, db: web::Data<Datastore>) -> ApiResult<HttpResponse> {
    let markets = market_repo::list(&db, Visibility::for_user(&user)).await?;
    Ok(HttpResponse::Ok().json(markets))
}

/// POST /api/markets
#[post("/markets")]
pub async fn create(
    user: CurrentUser,
    body: web::Json<NewMarket>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    let market = market_repo::insert(&db, Market::new(body.into_inner(), &user)).await?;
    log::info!("market {} ({}) opened by {}", market.name, market.id, user.name);
    Ok(HttpResponse::Ok().json(market))
}

/// PATCH /api/markets/players/{id}
#[patch("/markets/players/{player_id}")]
pub async fn update_player(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<MarketPlayerPatch>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    market_repo::update_player(&db, path.into_inner(), user.club_id, body.into_inner())
        .await?
        .map(|p| HttpResponse::Ok().json(p))
        .ok_or_else(|| ApiError::NotFound("Market player not found".into()))
}

/// PATCH /api/markets/{id}
#[patch("/markets/{market_id}")]
pub async fn update(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<MarketPatch>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    market_repo::update(&db, path.into_inner(), user.club_id, body.into_inner())
        .await?
        .map(|m| HttpResponse::Ok().json(m))
        .ok_or_else(market_not_found)
}

/// GET /api/markets/{id}/players
#[get("/markets/{market_id}/players")]
pub async fn players(
    user: CurrentUser,
    path: web::Path<Uuid>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    let market_id = path.into_inner();
    if market_repo::get(&db, market_id, user.club_id).await?.is_none() {
        return Err(market_not_found());
    }
    let tracked = market_repo::players(&db, market_id).await?;
    Ok(HttpResponse::Ok().json(tracked))
}

/// POST /api/markets/{id}/players
#[post("/markets/{market_id}/players")]
pub async fn add_player(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<NewMarketPlayer>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    let market_id = path.into_inner();
    if market_repo::get(&db, market_id, user.club_id).await?.is_none() {
        return Err(market_not_found());
    }
    let player = MarketPlayer::new(market_id, body.into_inner(), user.id);
    let player = market_repo::add_player(&db, player).await?;
    log::info!("{} added to market {market_id}", player.player_name);
    Ok(HttpResponse::Ok().json(player))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(create)
        .service(update_player)
        .service(update)
        .service(players)
        .service(add_player);
}
