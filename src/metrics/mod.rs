// Private module declaration
mod server;

use prometheus::{Gauge, IntCounter, IntCounterVec, IntGauge, Opts, Registry};

use crate::liveness::HealthReport;

// Re-export for public API
pub use server::{configure_routes, start_health_server, HealthRoutes, DEFAULT_HEALTH_PATH};

// ============================================================================
// Metrics Module - Prometheus metrics for the worker
// ============================================================================
//
// Provides metrics for:
// - Pipeline forward progress
// - Watchdog idle time and health answers
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for one worker process
pub struct Metrics {
    registry: Registry,

    // Pipeline Metrics
    pub pipeline_activity_total: IntCounter,

    // Watchdog Metrics
    pub pipeline_idle_seconds: Gauge,
    pub health_checks_total: IntCounterVec,
    pub worker_healthy: IntGauge,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // Pipeline Metrics
        let pipeline_activity_total = IntCounter::new(
            "pipeline_activity_total",
            "Total forward-progress reports from the media pipeline",
        )?;
        registry.register(Box::new(pipeline_activity_total.clone()))?;

        // Watchdog Metrics
        let pipeline_idle_seconds = Gauge::new(
            "pipeline_idle_seconds",
            "Seconds since the last pipeline progress, as of the last health check",
        )?;
        registry.register(Box::new(pipeline_idle_seconds.clone()))?;

        let health_checks_total = IntCounterVec::new(
            Opts::new("health_checks_total", "Total health queries answered"),
            &["status"],
        )?;
        registry.register(Box::new(health_checks_total.clone()))?;

        let worker_healthy = IntGauge::new(
            "worker_healthy",
            "Last health answer (0=Stalled, 1=Active)",
        )?;
        registry.register(Box::new(worker_healthy.clone()))?;

        Ok(Self {
            registry,
            pipeline_activity_total,
            pipeline_idle_seconds,
            health_checks_total,
            worker_healthy,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Helper to record one unit of pipeline progress
    pub fn record_activity(&self) {
        self.pipeline_activity_total.inc();
    }

    /// Helper to record a health answer
    pub fn record_health_check(&self, report: &HealthReport) {
        let status = if report.healthy { "active" } else { "stalled" };
        self.health_checks_total.with_label_values(&[status]).inc();
        self.worker_healthy.set(report.healthy as i64);
        self.pipeline_idle_seconds.set(report.seconds_since_activity);
    }
}
