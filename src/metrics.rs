//! Prometheus metrics & exposition endpoint.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{get, web, HttpResponse, Responder};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Process-wide registry served at `/metrics`.
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Inbound requests by method and response status.
pub static HTTP_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    register(IntCounterVec::new(
        Opts::new("api_http_requests_total", "Inbound HTTP requests"),
        &["method", "status"],
    ))
});

/// Upstream provider calls by outcome (`ok`, `status`, `transport`, `decode`).
pub static UPSTREAM_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    register(IntCounterVec::new(
        Opts::new("api_upstream_requests_total", "Sports-data provider calls"),
        &["outcome"],
    ))
});

/// Competition-name cache lookups (`hit`, `miss`).
pub static COMPETITION_CACHE: Lazy<IntCounterVec> = Lazy::new(|| {
    register(IntCounterVec::new(
        Opts::new("api_competition_cache_total", "Competition-name cache lookups"),
        &["result"],
    ))
});

fn register(counter: prometheus::Result<IntCounterVec>) -> IntCounterVec {
    let counter = counter.expect("metric definition");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric registration");
    counter
}

/// Middleware (via `middleware::from_fn`) counting every answered request.
pub async fn track_requests(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let method = req.method().clone();
    let res = next.call(req).await?;
    HTTP_REQUESTS
        .with_label_values(&[method.as_str(), res.status().as_str()])
        .inc();
    Ok(res)
}

#[get("/metrics")]
pub async fn metrics() -> impl Responder {
    let mut buf = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&REGISTRY.gather(), &mut buf) {
        log::error!("metrics encoding failed: {e}");
        return HttpResponse::InternalServerError().finish();
    }
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buf)
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(metrics);
}
