#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LivenessError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
