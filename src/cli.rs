//! Command-line interface definitions.
//!
//! Every option can also be supplied through the environment, which is how
//! the orchestrator configures workers.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::liveness::LivenessConfig;
use crate::metrics::{HealthRoutes, DEFAULT_HEALTH_PATH};
use crate::stream_target::{
    RetentionPolicy, RetentionType, ScopedStream, StreamTarget, StreamTargetError,
    DEFAULT_CONTROLLER,
};
use crate::topology::DEFAULT_STREAM_BASE_NAME;

/// Camera-to-stream-store ingestion workers.
#[derive(Parser, Debug)]
#[command(name = "camera-ingest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render one worker descriptor per replica as JSON
    Topology(TopologyArgs),

    /// Run one ingestion worker: health endpoint plus the media pipeline
    Worker(WorkerArgs),
}

/// Stream store connection settings handed through to the pipeline.
#[derive(Args, Debug, Clone)]
pub struct StreamStoreArgs {
    /// Stream store controller address
    #[arg(long, env = "PRAVEGA_CONTROLLER_URI", default_value = DEFAULT_CONTROLLER)]
    pub controller: String,

    /// Scope holding the worker streams
    #[arg(long, env = "PRAVEGA_SCOPE")]
    pub scope: String,

    /// Credentials file for the stream store client
    #[arg(long, env = "KEYCLOAK_SERVICE_ACCOUNT_FILE")]
    pub keycloak_file: Option<PathBuf>,

    /// Create the scope if it does not exist
    #[arg(
        long,
        env = "ALLOW_CREATE_SCOPE",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub allow_create_scope: bool,

    #[arg(long, env = "RETENTION_TYPE", value_enum, default_value_t = RetentionType::None)]
    pub retention_type: RetentionType,

    #[arg(long, env = "RETENTION_DAYS")]
    pub retention_days: Option<f64>,

    #[arg(long, env = "RETENTION_BYTES")]
    pub retention_bytes: Option<u64>,
}

impl StreamStoreArgs {
    pub fn stream_target(&self, stream: &str) -> Result<StreamTarget, StreamTargetError> {
        let retention =
            RetentionPolicy::new(self.retention_type, self.retention_days, self.retention_bytes)?;
        let scoped_stream = ScopedStream::parse(&format!("{}/{}", self.scope, stream))?;

        Ok(StreamTarget::new(self.controller.clone(), scoped_stream)?
            .with_keycloak_file(self.keycloak_file.clone())
            .with_allow_create_scope(self.allow_create_scope)
            .with_retention(retention))
    }
}

#[derive(Args, Debug, Clone)]
pub struct TopologyArgs {
    /// Number of worker replicas
    #[arg(long, env = "REPLICAS", default_value_t = 1)]
    pub replicas: u32,

    /// Base name for worker instances
    #[arg(long, env = "BASE_NAME")]
    pub base_name: String,

    /// Alias appended to instance names. Repeat (or comma-separate) to
    /// render several aliased variants into one namespace.
    #[arg(long, env = "ALIAS", value_delimiter = ',')]
    pub alias: Vec<String>,

    /// Base name for the backing streams
    #[arg(long, env = "STREAM_BASE_NAME", default_value = DEFAULT_STREAM_BASE_NAME)]
    pub stream_base_name: String,

    #[command(flatten)]
    pub store: StreamStoreArgs,
}

#[derive(Args, Debug, Clone)]
pub struct WorkerArgs {
    /// Report unhealthy when the pipeline goes quiet for too long
    #[arg(
        long,
        env = "HEALTH_CHECK_ENABLED",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub health_check_enabled: bool,

    /// Maximum tolerated silence in seconds; 0 disables the watchdog
    #[arg(
        long,
        env = "HEALTH_CHECK_IDLE_SECONDS",
        default_value_t = 0.0,
        allow_negative_numbers = true
    )]
    pub health_check_idle_seconds: f64,

    #[arg(long, env = "HEALTH_PORT", default_value_t = 8080)]
    pub health_port: u16,

    #[arg(long, env = "HEALTH_PATH", default_value = DEFAULT_HEALTH_PATH)]
    pub health_path: String,

    /// Stream this worker writes to, within the configured scope
    #[arg(long, env = "PRAVEGA_STREAM")]
    pub stream: String,

    #[command(flatten)]
    pub store: StreamStoreArgs,

    /// Pipeline command line, given after `--`
    #[arg(last = true, required = true)]
    pub pipeline: Vec<String>,
}

impl WorkerArgs {
    pub fn liveness_config(&self) -> LivenessConfig {
        LivenessConfig::new(self.health_check_enabled, self.health_check_idle_seconds)
    }

    pub fn health_routes(&self) -> HealthRoutes {
        HealthRoutes::new(self.health_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_parse_topology() {
        let Commands::Topology(args) = parse(&[
            "camera-ingest",
            "topology",
            "--replicas",
            "3",
            "--base-name",
            "cam",
            "--alias",
            "lobby,dock",
            "--scope",
            "examples",
        ]) else {
            panic!("expected topology command");
        };

        assert_eq!(args.replicas, 3);
        assert_eq!(args.base_name, "cam");
        assert_eq!(args.alias, vec!["lobby", "dock"]);
        assert_eq!(args.stream_base_name, "stream");
        assert_eq!(args.store.controller, DEFAULT_CONTROLLER);
        assert!(args.store.allow_create_scope);
    }

    #[test]
    fn test_parse_worker_with_pipeline() {
        let Commands::Worker(args) = parse(&[
            "camera-ingest",
            "worker",
            "--health-check-enabled",
            "true",
            "--health-check-idle-seconds",
            "30",
            "--scope",
            "examples",
            "--stream",
            "stream-0",
            "--retention-type",
            "daysAndBytes",
            "--retention-days",
            "7",
            "--retention-bytes",
            "1000000",
            "--",
            "gst-launch-1.0",
            "-e",
            "rtspsrc",
        ]) else {
            panic!("expected worker command");
        };

        assert_eq!(args.liveness_config(), LivenessConfig::new(true, 30.0));
        assert_eq!(args.health_routes().health_path, DEFAULT_HEALTH_PATH);
        assert_eq!(args.pipeline, vec!["gst-launch-1.0", "-e", "rtspsrc"]);

        let target = args.store.stream_target(&args.stream).unwrap();
        assert_eq!(target.scoped_stream.to_string(), "examples/stream-0");
        assert_eq!(
            target.retention,
            RetentionPolicy::DaysAndBytes { days: 7.0, bytes: 1_000_000 }
        );
    }

    #[test]
    fn test_worker_defaults_disable_watchdog() {
        let Commands::Worker(args) = parse(&[
            "camera-ingest",
            "worker",
            "--scope",
            "examples",
            "--stream",
            "stream",
            "--",
            "true",
        ]) else {
            panic!("expected worker command");
        };

        assert_eq!(args.liveness_config().idle_threshold().unwrap(), None);
        assert_eq!(args.health_port, 8080);
    }

    #[test]
    fn test_negative_idle_seconds_parse_but_fail_validation() {
        let Commands::Worker(args) = parse(&[
            "camera-ingest",
            "worker",
            "--health-check-enabled",
            "yes",
            "--health-check-idle-seconds",
            "-5",
            "--scope",
            "examples",
            "--stream",
            "stream",
            "--",
            "true",
        ]) else {
            panic!("expected worker command");
        };

        assert!(args.liveness_config().idle_threshold().is_err());
    }

    #[test]
    fn test_worker_requires_pipeline() {
        let result = Cli::try_parse_from([
            "camera-ingest",
            "worker",
            "--scope",
            "examples",
            "--stream",
            "stream",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_scope_with_slash_rejected() {
        let store = StreamStoreArgs {
            controller: DEFAULT_CONTROLLER.to_string(),
            scope: "a/b".to_string(),
            keycloak_file: None,
            allow_create_scope: true,
            retention_type: RetentionType::None,
            retention_days: None,
            retention_bytes: None,
        };
        assert!(matches!(
            store.stream_target("stream"),
            Err(StreamTargetError::MalformedScopedStream(_))
        ));
    }
}
