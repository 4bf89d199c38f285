//! Players entered by hand, for prospects the provider does not cover.

use actix_web::{get, post, web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::db::models::{FilterOptions, ManualPlayer, NewManualPlayer};
use crate::db::{player_repo, Datastore};
use crate::http::auth::CurrentUser;
use crate::http::error::ApiResult;
use crate::provider::normalize;

const DEFAULT_IMAGE: &str = "/default-player.png";

/// Build the stored row; the passport area falls back to the birth area.
pub fn manual_player(input: NewManualPlayer, organization: Option<uuid::Uuid>) -> ManualPlayer {
    let today = Utc::now().date_naive();
    let mut player = ManualPlayer::named(
        format!("{} {}", input.first_name.trim(), input.last_name.trim()),
        organization,
    );
    player.age = normalize::years_between(input.birth_date, today).and_then(|a| i32::try_from(a).ok());
    player.first_name = Some(input.first_name);
    player.last_name = Some(input.last_name);
    player.birth_date = Some(input.birth_date);
    player.passport_area = input.passport_area.or_else(|| Some(input.birth_area.clone()));
    player.birth_area = Some(input.birth_area);
    player.height = input.height;
    player.weight = input.weight;
    player.foot = input.foot;
    player.position = Some(input.position);
    player.current_team_name = input.current_team_name;
    player.current_team_area = input.current_team_area;
    player.contract_expiration = input.contract_expiration;
    player.market_value = input.market_value;
    player.agent = input.agent;
    player.image_url = input.image_url.or_else(|| Some(DEFAULT_IMAGE.to_string()));
    player.notes = input.notes;
    player
}

/// POST /api/players/manual
#[post("/players/manual")]
pub async fn create(
    user: CurrentUser,
    body: web::Json<NewManualPlayer>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    let player = player_repo::insert(&db, manual_player(body.into_inner(), user.club_id)).await?;
    log::info!("manual player {} created by {}", player.name, user.name);
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Player created",
        "player_id": player.id,
        "player": player,
    })))
}

/// GET /api/players/manual
#[get("/players/manual")]
pub async fn list(user: CurrentUser, db: web::Data<Datastore>) -> ApiResult<HttpResponse> {
    let players = player_repo::list_manual(&db, user.club_id).await?;
    Ok(HttpResponse::Ok().json(players))
}

/// GET /api/players/manual/filters
#[get("/players/manual/filters")]
pub async fn filters(user: CurrentUser, db: web::Data<Datastore>) -> ApiResult<HttpResponse> {
    let players = player_repo::list_manual(&db, user.club_id).await?;
    Ok(HttpResponse::Ok().json(FilterOptions::from_players(&players)))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create).service(list).service(filters);
}
