use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::Instant;

use super::config::LivenessConfig;
use super::errors::LivenessError;

// ============================================================================
// Liveness Supervisor
// ============================================================================
//
// States:
// - Active:  now - last_activity <= idle_threshold, or watchdog disabled
// - Stalled: now - last_activity >  idle_threshold
//
// Active -> Stalled happens lazily: every query recomputes the predicate.
// Stalled -> Active happens the moment record_activity() runs.
//
// The only shared mutable state is the last activity timestamp, kept as
// nanoseconds since `origin` in a single atomic. Writers advance it with
// fetch_max, so it never moves backwards and readers never see a torn value.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LivenessState {
    Active,
    Stalled,
}

/// Informational payload for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: LivenessState,
    pub healthy: bool,
    pub watchdog_enabled: bool,
    pub seconds_since_activity: f64,
    pub idle_threshold_seconds: Option<f64>,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct LivenessSupervisor {
    origin: Instant,
    last_activity_nanos: AtomicU64,
    idle_threshold: Option<Duration>,
}

impl LivenessSupervisor {
    /// Build a supervisor whose last activity is "now" (process start).
    pub fn new(config: LivenessConfig) -> Result<Self, LivenessError> {
        let idle_threshold = config.idle_threshold()?;

        match idle_threshold {
            Some(threshold) => tracing::info!(
                idle_threshold_secs = threshold.as_secs_f64(),
                "Liveness watchdog enabled"
            ),
            None => tracing::info!("Liveness watchdog disabled, worker always reports healthy"),
        }

        Ok(Self {
            origin: Instant::now(),
            last_activity_nanos: AtomicU64::new(0),
            idle_threshold,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.idle_threshold.is_some()
    }

    /// Called by the pipeline on every unit of forward progress.
    pub fn record_activity(&self) {
        let now = self.elapsed_nanos();
        let previous = self.last_activity_nanos.fetch_max(now, Ordering::AcqRel);

        if let Some(threshold) = self.idle_threshold {
            let silence = Duration::from_nanos(now.saturating_sub(previous));
            if silence > threshold {
                tracing::info!(
                    silent_for_secs = silence.as_secs_f64(),
                    "Pipeline activity resumed after stall"
                );
            }
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.state() == LivenessState::Active
    }

    pub fn state(&self) -> LivenessState {
        self.evaluate(self.idle_for())
    }

    /// Time since the last recorded activity
    pub fn idle_for(&self) -> Duration {
        let now = self.elapsed_nanos();
        let last = self.last_activity_nanos.load(Ordering::Acquire);
        Duration::from_nanos(now.saturating_sub(last))
    }

    #[allow(dead_code)]
    pub fn last_activity_at(&self) -> Instant {
        self.origin + Duration::from_nanos(self.last_activity_nanos.load(Ordering::Acquire))
    }

    pub fn snapshot(&self) -> HealthReport {
        let idle = self.idle_for();
        let status = self.evaluate(idle);

        HealthReport {
            status,
            healthy: status == LivenessState::Active,
            watchdog_enabled: self.is_enabled(),
            seconds_since_activity: idle.as_secs_f64(),
            idle_threshold_seconds: self.idle_threshold.map(|t| t.as_secs_f64()),
            checked_at: Utc::now(),
        }
    }

    fn evaluate(&self, idle: Duration) -> LivenessState {
        match self.idle_threshold {
            Some(threshold) if idle > threshold => LivenessState::Stalled,
            _ => LivenessState::Active,
        }
    }

    fn elapsed_nanos(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::advance;

    fn enabled(secs: f64) -> LivenessSupervisor {
        LivenessSupervisor::new(LivenessConfig::new(true, secs)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalls_after_threshold_and_recovers_on_activity() {
        let supervisor = enabled(30.0);
        supervisor.record_activity();

        advance(Duration::from_secs(29)).await;
        assert!(supervisor.is_healthy());

        advance(Duration::from_secs(2)).await;
        assert!(!supervisor.is_healthy());
        assert_eq!(supervisor.state(), LivenessState::Stalled);

        supervisor.record_activity();
        assert!(supervisor.is_healthy());
        assert_eq!(supervisor.idle_for(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exact_threshold_is_still_active() {
        let supervisor = enabled(30.0);

        advance(Duration::from_secs(30)).await;
        assert!(supervisor.is_healthy());

        advance(Duration::from_millis(1)).await;
        assert!(!supervisor.is_healthy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_active_from_process_start() {
        let supervisor = enabled(10.0);
        assert_eq!(supervisor.state(), LivenessState::Active);

        // no activity at all: process start counts as the last activity
        advance(Duration::from_secs(11)).await;
        assert_eq!(supervisor.state(), LivenessState::Stalled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_is_always_healthy() {
        for config in [LivenessConfig::new(false, 30.0), LivenessConfig::new(true, 0.0)] {
            let supervisor = LivenessSupervisor::new(config).unwrap();
            assert!(!supervisor.is_enabled());

            advance(Duration::from_secs(3600)).await;
            assert!(supervisor.is_healthy());

            supervisor.record_activity();
            advance(Duration::from_secs(86_400)).await;
            assert!(supervisor.is_healthy());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_queries_do_not_mutate_state() {
        let supervisor = enabled(5.0);
        advance(Duration::from_secs(3)).await;

        let before = supervisor.last_activity_at();
        for _ in 0..10 {
            supervisor.is_healthy();
            supervisor.snapshot();
        }
        assert_eq!(supervisor.last_activity_at(), before);
        assert_eq!(supervisor.idle_for(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_reports_idle_time() {
        let supervisor = enabled(30.0);
        advance(Duration::from_secs(45)).await;

        let report = supervisor.snapshot();
        assert_eq!(report.status, LivenessState::Stalled);
        assert!(!report.healthy);
        assert!(report.watchdog_enabled);
        assert_eq!(report.seconds_since_activity, 45.0);
        assert_eq!(report.idle_threshold_seconds, Some(30.0));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "stalled");
    }

    #[test]
    fn test_invalid_threshold_fails_construction() {
        let err = LivenessSupervisor::new(LivenessConfig::new(true, -5.0)).unwrap_err();
        assert!(matches!(err, LivenessError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_concurrent_activity_never_tears_or_regresses() {
        let supervisor = Arc::new(enabled(3600.0));

        let reader = {
            let supervisor = supervisor.clone();
            std::thread::spawn(move || {
                let mut previous = supervisor.last_activity_at();
                for _ in 0..1000 {
                    assert!(supervisor.is_healthy());
                    let current = supervisor.last_activity_at();
                    assert!(current >= previous);
                    previous = current;
                }
            })
        };

        let writers: Vec<_> = (0..8)
            .map(|_| {
                let supervisor = supervisor.clone();
                std::thread::spawn(move || {
                    let mut latest_start = supervisor.last_activity_at();
                    for _ in 0..125 {
                        latest_start = Instant::now();
                        supervisor.record_activity();
                    }
                    latest_start
                })
            })
            .collect();

        let latest_starts: Vec<Instant> = writers
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        reader.join().unwrap();

        let last = supervisor.last_activity_at();
        for start in latest_starts {
            assert!(last >= start);
        }
        assert!(supervisor.is_healthy());
    }
}
