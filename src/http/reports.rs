use actix_web::{get, post, put, web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use crate::db::models::{ScoutReport, ScoutReportInput};
use crate::db::{report_repo, Datastore, Visibility};
use crate::http::auth::CurrentUser;
use crate::http::error::{ApiError, ApiResult};

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportAverages {
    pub overall: f64,
    pub technique: f64,
    pub speed: f64,
}

#[derive(Serialize)]
pub struct PlayerReports {
    pub total_reports: usize,
    /// Only present when there is more than one report to average.
    pub averages: Option<ReportAverages>,
    pub latest_report: Option<ScoutReport>,
    pub reports: Vec<ScoutReport>,
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

impl ReportAverages {
    /// Mean ratings rounded to one decimal; `None` for fewer than two reports.
    pub fn of(reports: &[ScoutReport]) -> Option<Self> {
        if reports.len() < 2 {
            return None;
        }
        let n = reports.len() as f64;
        let mean = |f: fn(&ScoutReportInput) -> i32| {
            round1(reports.iter().map(|r| f64::from(f(&r.fields))).sum::<f64>() / n)
        };
        Some(ReportAverages {
            overall: mean(|f| f.overall_rating),
            technique: mean(|f| f.technique),
            speed: mean(|f| f.speed),
        })
    }
}

//////////////////////////////////////////////////
// POST /api/scout-reports
//////////////////////////////////////////////////
#[post("/scout-reports")]
pub async fn create(
    user: CurrentUser,
    body: web::Json<ScoutReportInput>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    let report = ScoutReport::new(body.into_inner(), &user);
    let report = report_repo::insert(&db, report).await?;
    log::info!("scout report {} filed by {}", report.id, user.name);
    Ok(HttpResponse::Ok().json(report))
}

//////////////////////////////////////////////////
// GET /api/scout-reports
//////////////////////////////////////////////////
#[get("/scout-reports")]
pub async fn list(user: CurrentUser, db: web::Data<Datastore>) -> ApiResult<HttpResponse> {
    let reports = report_repo::list(&db, Visibility::for_user(&user)).await?;
    log::debug!("{} reports visible to {}", reports.len(), user.email);
    Ok(HttpResponse::Ok().json(reports))
}

//////////////////////////////////////////////////
// PUT /api/scout-reports/{id}
//////////////////////////////////////////////////
#[put("/scout-reports/{report_id}")]
pub async fn update(
    user: CurrentUser,
    path: web::Path<Uuid>,
    body: web::Json<ScoutReportInput>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();
    match report_repo::update(&db, id, user.club_id, body.into_inner(), &user).await? {
        Some(report) => {
            log::info!("scout report {id} updated by {}", user.name);
            Ok(HttpResponse::Ok().json(report))
        }
        None => Err(ApiError::NotFound("Report not found".into())),
    }
}

//////////////////////////////////////////////////
// GET /api/scout-reports/player/{wyscout_id}
//////////////////////////////////////////////////
#[get("/scout-reports/player/{wyscout_id}")]
pub async fn by_wyscout_id(
    user: CurrentUser,
    path: web::Path<i64>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    let reports =
        report_repo::by_wyscout_id(&db, Visibility::for_user(&user), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reports))
}

//////////////////////////////////////////////////
// GET /api/scout-reports/player/{player_id}/all
//////////////////////////////////////////////////
#[get("/scout-reports/player/{player_id}/all")]
pub async fn all_for_player(
    user: CurrentUser,
    path: web::Path<String>,
    db: web::Data<Datastore>,
) -> ApiResult<HttpResponse> {
    let reports =
        report_repo::by_player_id(&db, Visibility::for_user(&user), &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PlayerReports {
        total_reports: reports.len(),
        averages: ReportAverages::of(&reports),
        latest_report: reports.last().cloned(),
        reports,
    }))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create)
        .service(list)
        .service(update)
        .service(by_wyscout_id)
        .service(all_for_player);
}
