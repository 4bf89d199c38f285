//! Club-authored scouting profiles of individual players.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::db::models::{ManualPlayer, PlayerProfile, PlayerProfileInput, User};
use crate::db::{player_repo, profile_repo, Datastore, Visibility};
use crate::http::auth::CurrentUser;
use crate::http::error::{ApiError, ApiResult};

fn profile_not_found() -> ApiError {
    ApiError::NotFound("Player profile not found".into())
}

/// Backing `players` row for a profile without a provider id: an existing
/// row of the same name in the author's club, or a freshly created one.
async fn backing_player(
    db: &Datastore,
    fields: &PlayerProfileInput,
    author: &User,
) -> anyhow::Result<Option<Uuid>> {
    if fields.wyscout_id.is_some() {
        return Ok(None);
    }
    if let Some(id) = player_repo::find_by_name(db, &fields.player_name, author.club_id).await? {
        return Ok(Some(id));
    }

    let mut player = ManualPlayer::named(fields.player_name.clone(), author.club_id);
    player.position = fields.position.clone();
    player.age = fields.age;
    player.current_team_name = fields.current_team.clone();
    player.passport_area = fields.nationality.clone();
    player.height = fields.height;
    player.weight = fields.weight;
    player.foot = fields.foot.clone();
    player.image_url = fields.image_url.clone();

    let player = player_repo::insert(db, player).await?;
    log::info!("created manual player {} for profile", player.id);
    Ok(Some(player.id))
}

/// GET /api/player-profiles
#[get("/player-profiles")]
pub async fn list(user: CurrentUser, db: web::Data<Datastore>) -> ApiResult<HttpResponse> {
    let profiles = profile_repo::list(&db, Visibility::for_user(&user)).await?;
    Ok(HttpResponse::Ok().json(profiles))
}

/// POST /api/player-profiles
#[post("/player-profiles")]
pub async fn create(
    user: CurrentUser,
    body: web::Json<PlayerProfileInput>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    let fields = body.into_inner();
    let player_id = backing_player(&db, &fields, &user).await?;
    let profile = profile_repo::insert(&db, PlayerProfile::new(fields, player_id, &user)).await?;
    log::info!("profile {} for {} created by {}", profile.id, profile.fields.player_name, user.name);
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /api/player-profiles/{id}
#[get("/player-profiles/{profile_id}")]
pub async fn show(
    user: CurrentUser,
    path: web::Path<Uuid>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    profile_repo::get(&db, path.into_inner(), user.club_id)
        .await?
        .map(|p| HttpResponse::Ok().json(p))
        .ok_or_else(profile_not_found)
}

/// PUT /api/player-profiles/{id}
#[put("/player-profiles/{profile_id}")]
pub async fn update(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<PlayerProfileInput>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    profile_repo::update(&db, path.into_inner(), user.club_id, body.into_inner(), &user)
        .await?
        .map(|p| HttpResponse::Ok().json(p))
        .ok_or_else(profile_not_found)
}

/// DELETE /api/player-profiles/{id}
#[delete("/player-profiles/{profile_id}")]
pub async fn remove(
    user: CurrentUser,
    path: web::Path<Uuid>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    if !profile_repo::delete(&db, id, user.club_id).await? {
        return Err(profile_not_found());
    }
    log::info!("profile {id} deleted by {}", user.name);
    Ok(HttpResponse::Ok().json(json!({ "message": "Player profile deleted successfully" })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(create)
        .service(show)
        .service(update)
        .service(remove);
}
