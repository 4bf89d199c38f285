use crate::{http, metrics};
use actix_web::web;

/// Mount every HTTP sub-module: `/`, `/metrics` and the `/api` scope.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(http::health::init_root)
        .configure(metrics::init_routes)
        .service(
            web::scope("/api")
                .configure(http::health::init_routes)
                .configure(http::auth::init_routes)
                .configure(http::hierarchy::init_routes)
                .configure(http::search::init_routes)
                .configure(http::players::init_routes)
                .configure(http::stats::init_routes)
                .configure(http::reports::init_routes)
                .configure(http::markets::init_routes)
                .configure(http::manual_players::init_routes)
                .configure(http::profiles::init_routes),
        );
}
