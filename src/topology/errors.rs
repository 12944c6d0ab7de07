// ============================================================================
// Topology Argument Errors
// ============================================================================
//
// Every variant is an invalid argument. Deployment generation aborts on
// any of them.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TopologyError {
    #[error("Replica count must be at least 1, got {0}")]
    InvalidReplicaCount(u32),

    #[error("Base name cannot be empty")]
    EmptyBaseName,

    #[error("Stream base name cannot be empty")]
    EmptyStreamBaseName,

    #[error("Alias '{0}' may only contain ASCII letters, digits and '-'")]
    InvalidAlias(String),
}
