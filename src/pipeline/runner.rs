use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use super::errors::PipelineError;
use crate::liveness::LivenessSupervisor;
use crate::metrics::Metrics;
use crate::stream_target::StreamTarget;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// The external pipeline invocation, e.g. a `gst-launch-1.0` command line
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PipelineCommand {
    pub fn from_argv(argv: Vec<String>) -> Result<Self, PipelineError> {
        let mut argv = argv.into_iter();
        let program = argv
            .next()
            .filter(|p| !p.is_empty())
            .ok_or(PipelineError::EmptyCommand)?;

        Ok(Self {
            program,
            args: argv.collect(),
        })
    }
}

/// Run the pipeline until it exits, reporting every chunk it writes to
/// stdout as forward progress.
pub async fn run_pipeline(
    command: &PipelineCommand,
    target: &StreamTarget,
    supervisor: Arc<LivenessSupervisor>,
    metrics: Arc<Metrics>,
) -> Result<ExitStatus, PipelineError> {
    tracing::info!(
        program = %command.program,
        stream = %target.scoped_stream,
        controller = %target.controller,
        "Launching pipeline"
    );

    let mut child = Command::new(&command.program)
        .args(&command.args)
        .envs(target.env_vars())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| PipelineError::Spawn {
            program: command.program.clone(),
            source,
        })?;

    let mut stdout = child.stdout.take().ok_or(PipelineError::MissingStdout)?;
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut chunks: u64 = 0;

    loop {
        let read = stdout.read(&mut buffer).await.map_err(PipelineError::Read)?;
        if read == 0 {
            break;
        }
        supervisor.record_activity();
        metrics.record_activity();
        chunks += 1;
    }

    let status = child.wait().await.map_err(PipelineError::Wait)?;
    if status.success() {
        tracing::info!(chunks, "Pipeline exited");
    } else {
        tracing::error!(chunks, %status, "Pipeline failed");
    }
    Ok(status)
}
