use anyhow::{bail, Result};
use std::sync::Arc;

use crate::cli::{TopologyArgs, WorkerArgs};
use crate::liveness::LivenessSupervisor;
use crate::metrics::{start_health_server, Metrics};
use crate::pipeline::{run_pipeline, PipelineCommand};
use crate::stream_target::WorkerDescriptor;
use crate::topology::{allocate, detect_conflicts, TopologyRequest};

// ============================================================================
// Command Runners
// ============================================================================

/// Allocate replicas for every requested alias and join them with the
/// stream store settings. Fails on invalid arguments or on instance names
/// that collide across the rendered variants.
pub fn render_topology(args: &TopologyArgs) -> Result<Vec<WorkerDescriptor>> {
    let template = args.store.stream_target(&args.stream_base_name)?;

    let aliases: Vec<Option<&str>> = if args.alias.is_empty() {
        vec![None]
    } else {
        args.alias.iter().map(|a| Some(a.as_str())).collect()
    };

    let mut specs = Vec::new();
    for alias in aliases {
        let mut request = TopologyRequest::new(args.replicas, args.base_name.clone())
            .with_stream_base_name(args.stream_base_name.clone());
        if let Some(alias) = alias {
            request = request.with_alias(alias);
        }
        specs.extend(allocate(&request)?);
    }

    let conflicts = detect_conflicts(&specs);
    if !conflicts.is_empty() {
        let details: Vec<String> = conflicts
            .iter()
            .map(|c| {
                format!(
                    "{} (replica {} at position {} collides with replica {})",
                    c.instance_name, c.loser_index, c.position, c.winner_index
                )
            })
            .collect();
        bail!("Instance name collision: {}", details.join(", "));
    }

    tracing::info!(workers = specs.len(), "Rendered worker topology");

    Ok(specs
        .iter()
        .map(|spec| WorkerDescriptor::new(spec, &template))
        .collect())
}

/// Run a worker until its pipeline exits or the process is interrupted.
/// Returns the exit code the process should terminate with.
pub async fn run_worker(args: WorkerArgs) -> Result<i32> {
    // Refuse to start on an ambiguous watchdog configuration
    let supervisor = Arc::new(LivenessSupervisor::new(args.liveness_config())?);
    let metrics = Arc::new(Metrics::new()?);
    let target = args.store.stream_target(&args.stream)?;
    let command = PipelineCommand::from_argv(args.pipeline.clone())?;

    let server = start_health_server(
        supervisor.clone(),
        metrics.clone(),
        args.health_routes(),
        args.health_port,
    );

    tokio::select! {
        result = server => {
            result?;
            bail!("Health server stopped unexpectedly");
        }
        result = run_pipeline(&command, &target, supervisor, metrics) => {
            let status = result?;
            Ok(status.code().unwrap_or(1))
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            Ok(0)
        }
    }
}
