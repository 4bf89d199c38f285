//! Liveness / readiness probes and upstream connectivity checks

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use crate::config::Settings;
use crate::db::Datastore;
use crate::provider::ProviderClient;

/// Areas returned by the sync probe.
const SYNC_SAMPLE: usize = 10;

/// GET /
#[get("/")]
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Football Scouting API is running!",
        "status": "success",
    }))
}

/// GET /api/health
#[get("/health")]
pub async fn health(db: web::Data<Datastore>, settings: web::Data<Settings>) -> impl Responder {
    let environment = json!({
        "database_configured": db.is_persistent(),
        "provider_configured": settings.provider.is_configured(),
    });

    if let Err(e) = db.ping().await {
        log::warn!("health check: {e:?}");
        return HttpResponse::ServiceUnavailable().json(json!({
            "status": "error",
            "environment": environment,
            "message": "database unreachable",
        }));
    }

    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "environment": environment,
        "message": "All systems operational",
    }))
}

/// GET /api/provider/status
#[get("/provider/status")]
pub async fn provider_status(
    client: web::Data<ProviderClient>,
    settings: web::Data<Settings>,
) -> impl Responder {
    if !settings.provider.is_configured() {
        return HttpResponse::Ok().json(json!({
            "status": "error",
            "message": "provider credentials not configured",
        }));
    }

    match client.areas().await {
        Ok(areas) => HttpResponse::Ok().json(json!({
            "status": "success",
            "message": "provider connection successful",
            "areas_count": areas.len(),
        })),
        Err(e) => {
            log::warn!("provider status check failed: {e}");
            HttpResponse::Ok().json(json!({
                "status": "error",
                "message": format!("provider connection failed: {e}"),
            }))
        }
    }
}

/// GET /api/sync/areas
#[get("/sync/areas")]
pub async fn sync_areas(client: web::Data<ProviderClient>) -> impl Responder {
    match client.areas_raw().await {
        Ok(mut areas) => {
            let total = areas.len();
            areas.truncate(SYNC_SAMPLE);
            HttpResponse::Ok().json(json!({
                "message": format!("Found {total} areas from provider"),
                "areas": areas,
            }))
        }
        Err(e) => {
            log::error!("area sync failed: {e}");
            HttpResponse::InternalServerError().json(json!({ "detail": "Sync failed" }))
        }
    }
}

/// Mounted at the application root, outside `/api`.
pub fn init_root(cfg: &mut web::ServiceConfig) {
    cfg.service(root);
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(provider_status).service(sync_areas);
}
