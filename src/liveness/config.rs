use std::time::Duration;

use super::errors::LivenessError;

/// Watchdog settings, normally read from `HEALTH_CHECK_ENABLED` and
/// `HEALTH_CHECK_IDLE_SECONDS`.
///
/// The default is disabled: deployments that do not opt in always report
/// healthy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LivenessConfig {
    pub enabled: bool,
    pub idle_threshold_secs: f64,
}

impl LivenessConfig {
    pub fn new(enabled: bool, idle_threshold_secs: f64) -> Self {
        Self {
            enabled,
            idle_threshold_secs,
        }
    }

    #[allow(dead_code)]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Resolve the effective threshold. `None` means the watchdog is off.
    ///
    /// The threshold is validated even when the watchdog is disabled so a
    /// bad value is caught before someone flips the flag.
    pub fn idle_threshold(&self) -> Result<Option<Duration>, LivenessError> {
        let secs = self.idle_threshold_secs;
        if !secs.is_finite() || secs < 0.0 {
            return Err(LivenessError::InvalidConfiguration(format!(
                "idle threshold must be a finite, non-negative number of seconds, got {}",
                secs
            )));
        }

        let threshold = Duration::try_from_secs_f64(secs).map_err(|e| {
            LivenessError::InvalidConfiguration(format!("idle threshold {}s: {}", secs, e))
        })?;

        if !self.enabled || threshold.is_zero() {
            return Ok(None);
        }
        Ok(Some(threshold))
    }
}
