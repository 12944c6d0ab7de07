use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;

use super::Metrics;
use crate::liveness::LivenessSupervisor;

pub const DEFAULT_HEALTH_PATH: &str = "/ishealthy";

/// Paths served by the worker's HTTP surface
#[derive(Debug, Clone)]
pub struct HealthRoutes {
    pub health_path: String,
}

impl HealthRoutes {
    pub fn new(health_path: impl Into<String>) -> Self {
        Self {
            health_path: health_path.into(),
        }
    }
}

impl Default for HealthRoutes {
    fn default() -> Self {
        Self::new(DEFAULT_HEALTH_PATH)
    }
}

/// Register the liveness and metrics routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, routes: &HealthRoutes) {
    cfg.route(&routes.health_path, web::get().to(health_handler))
        .route("/metrics", web::get().to(metrics_handler));
}

/// Start the health and metrics HTTP server
pub async fn start_health_server(
    supervisor: Arc<LivenessSupervisor>,
    metrics: Arc<Metrics>,
    routes: HealthRoutes,
    port: u16,
) -> std::io::Result<()> {
    tracing::info!(
        "Starting health server on http://0.0.0.0:{}{} (metrics on /metrics)",
        port,
        routes.health_path
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(supervisor.clone()))
            .app_data(web::Data::new(metrics.clone()))
            .configure(|cfg| configure_routes(cfg, &routes))
    })
    .workers(1)
    .disable_signals()
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

async fn health_handler(
    supervisor: web::Data<Arc<LivenessSupervisor>>,
    metrics: web::Data<Arc<Metrics>>,
) -> impl Responder {
    let report = supervisor.snapshot();
    metrics.record_health_check(&report);

    if report.healthy {
        HttpResponse::Ok().json(report)
    } else {
        tracing::warn!(
            seconds_since_activity = report.seconds_since_activity,
            idle_threshold_seconds = ?report.idle_threshold_seconds,
            "Pipeline stalled, reporting unhealthy"
        );
        HttpResponse::ServiceUnavailable().json(report)
    }
}

async fn metrics_handler(metrics: web::Data<Arc<Metrics>>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = metrics.registry().gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}
