use serde::{Deserialize, Serialize};

use super::errors::TopologyError;

// ============================================================================
// Replica Topology Allocator
// ============================================================================
//
// instance_name = base_name [ "-" alias ] [ "-" index ]
// stream_name   = stream_base_name [ "-" index ]
//
// The index suffix is only present when replica_count > 1. The alias only
// ever lands on the instance name; aliased variants share the stream
// numbering scheme.
//
// ============================================================================

pub const DEFAULT_STREAM_BASE_NAME: &str = "stream";

/// One row of the allocator output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaSpec {
    pub index: u32,
    pub instance_name: String,
    pub stream_name: String,
}

/// Deployment render input for the allocator
#[derive(Debug, Clone)]
pub struct TopologyRequest {
    pub replica_count: u32,
    pub base_name: String,
    pub alias: Option<String>,
    pub stream_base_name: String,
}

impl TopologyRequest {
    pub fn new(replica_count: u32, base_name: impl Into<String>) -> Self {
        Self {
            replica_count,
            base_name: base_name.into(),
            alias: None,
            stream_base_name: DEFAULT_STREAM_BASE_NAME.to_string(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_stream_base_name(mut self, stream_base_name: impl Into<String>) -> Self {
        self.stream_base_name = stream_base_name.into();
        self
    }

    fn validate(&self) -> Result<(), TopologyError> {
        if self.replica_count < 1 {
            return Err(TopologyError::InvalidReplicaCount(self.replica_count));
        }
        if self.base_name.is_empty() {
            return Err(TopologyError::EmptyBaseName);
        }
        if self.stream_base_name.is_empty() {
            return Err(TopologyError::EmptyStreamBaseName);
        }
        if let Some(alias) = &self.alias {
            if !alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(TopologyError::InvalidAlias(alias.clone()));
            }
        }
        Ok(())
    }
}

/// Compute the ordered replica specs for a deployment
pub fn allocate(request: &TopologyRequest) -> Result<Vec<ReplicaSpec>, TopologyError> {
    request.validate()?;

    let alias_suffix = match request.alias.as_deref() {
        Some(alias) if !alias.is_empty() => format!("-{}", alias),
        _ => String::new(),
    };

    let specs = (0..request.replica_count)
        .map(|index| {
            let num_suffix = if request.replica_count == 1 {
                String::new()
            } else {
                format!("-{}", index)
            };

            ReplicaSpec {
                index,
                instance_name: format!("{}{}{}", request.base_name, alias_suffix, num_suffix),
                stream_name: format!("{}{}", request.stream_base_name, num_suffix),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        replica_count = request.replica_count,
        base_name = %request.base_name,
        alias = ?request.alias,
        "Allocated replica topology"
    );

    Ok(specs)
}

// ============================================================================
// Unit Tests
// ============================================================================
