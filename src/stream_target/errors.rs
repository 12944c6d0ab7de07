// ============================================================================
// Stream Target Configuration Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamTargetError {
    #[error("stream parameter '{0}' is formatted incorrectly. It must be specified as scope/stream.")]
    MalformedScopedStream(String),

    #[error("{0} is not set")]
    MissingRetentionSetting(&'static str),

    #[error("Invalid retention days: {0}")]
    InvalidRetentionDays(f64),

    #[error("Controller address cannot be empty")]
    EmptyController,
}
