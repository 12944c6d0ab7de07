use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use super::errors::StreamTargetError;
use super::value_objects::{RetentionPolicy, ScopedStream};
use crate::topology::ReplicaSpec;

pub const DEFAULT_CONTROLLER: &str = "127.0.0.1:9090";

pub const ENV_CONTROLLER: &str = "PRAVEGA_CONTROLLER_URI";
pub const ENV_SCOPE: &str = "PRAVEGA_SCOPE";
pub const ENV_STREAM: &str = "PRAVEGA_STREAM";
pub const ENV_KEYCLOAK_FILE: &str = "KEYCLOAK_SERVICE_ACCOUNT_FILE";
pub const ENV_ALLOW_CREATE_SCOPE: &str = "ALLOW_CREATE_SCOPE";
pub const ENV_RETENTION_TYPE: &str = "RETENTION_TYPE";
pub const ENV_RETENTION_DAYS: &str = "RETENTION_DAYS";
pub const ENV_RETENTION_BYTES: &str = "RETENTION_BYTES";

/// Where a worker's pipeline writes, and how it authenticates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamTarget {
    pub controller: String,
    pub scoped_stream: ScopedStream,
    pub keycloak_file: Option<PathBuf>,
    pub allow_create_scope: bool,
    pub retention: RetentionPolicy,
}

impl StreamTarget {
    pub fn new(
        controller: impl Into<String>,
        scoped_stream: ScopedStream,
    ) -> Result<Self, StreamTargetError> {
        let controller = controller.into();
        if controller.is_empty() {
            return Err(StreamTargetError::EmptyController);
        }

        Ok(Self {
            controller,
            scoped_stream,
            keycloak_file: None,
            allow_create_scope: true,
            retention: RetentionPolicy::None,
        })
    }

    pub fn with_keycloak_file(mut self, keycloak_file: Option<PathBuf>) -> Self {
        self.keycloak_file = keycloak_file;
        self
    }

    pub fn with_allow_create_scope(mut self, allow_create_scope: bool) -> Self {
        self.allow_create_scope = allow_create_scope;
        self
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    /// Same connection settings, pointed at another stream in the same scope
    pub fn for_stream(&self, stream: impl Into<String>) -> Self {
        let mut target = self.clone();
        target.scoped_stream.stream = stream.into();
        target
    }

    /// Environment handed to the pipeline process
    pub fn env_vars(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        env.insert(ENV_CONTROLLER.to_string(), self.controller.clone());
        env.insert(ENV_SCOPE.to_string(), self.scoped_stream.scope.clone());
        env.insert(ENV_STREAM.to_string(), self.scoped_stream.stream.clone());
        env.insert(ENV_ALLOW_CREATE_SCOPE.to_string(), self.allow_create_scope.to_string());

        env.insert(
            ENV_RETENTION_TYPE.to_string(),
            self.retention.retention_type().as_str().to_string(),
        );
        let (days, bytes) = match self.retention {
            RetentionPolicy::None => (None, None),
            RetentionPolicy::Days { days } => (Some(days), None),
            RetentionPolicy::Bytes { bytes } => (None, Some(bytes)),
            RetentionPolicy::DaysAndBytes { days, bytes } => (Some(days), Some(bytes)),
        };
        if let Some(days) = days {
            env.insert(ENV_RETENTION_DAYS.to_string(), days.to_string());
        }
        if let Some(bytes) = bytes {
            env.insert(ENV_RETENTION_BYTES.to_string(), bytes.to_string());
        }

        if let Some(path) = &self.keycloak_file {
            env.insert(ENV_KEYCLOAK_FILE.to_string(), path.display().to_string());
        }
        env
    }
}

/// One rendered worker: its name, its stream, and the environment it runs with
#[derive(Debug, Clone, Serialize)]
pub struct WorkerDescriptor {
    pub index: u32,
    pub instance_name: String,
    pub stream: String,
    pub env: BTreeMap<String, String>,
}

impl WorkerDescriptor {
    /// `template` supplies the scope and connection settings; its stream is
    /// replaced by the replica's stream name.
    pub fn new(spec: &ReplicaSpec, template: &StreamTarget) -> Self {
        let target = template.for_stream(spec.stream_name.clone());
        Self {
            index: spec.index,
            instance_name: spec.instance_name.clone(),
            stream: target.scoped_stream.to_string(),
            env: target.env_vars(),
        }
    }
}
