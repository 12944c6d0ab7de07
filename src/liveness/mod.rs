// ============================================================================
// Pipeline Liveness
// ============================================================================
//
// Watchdog that turns "time since the pipeline last made progress" into a
// binary health answer for the orchestrator's liveness probe.
//
// Structure:
// - config      - Threshold settings read at process start
// - supervisor  - Shared timestamp, activity feed and health queries
// - errors      - Construction-time failures
//
// The supervisor only reports. Restarting a stalled worker is the
// orchestrator's decision.
//
// ============================================================================

pub mod config;
pub mod errors;
pub mod supervisor;

pub use config::LivenessConfig;
pub use errors::LivenessError;
pub use supervisor::{HealthReport, LivenessState, LivenessSupervisor};
