use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod app;
mod cli;
mod liveness;
mod metrics;
mod pipeline;
mod stream_target;
mod topology;

use cli::{Cli, Commands};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var.
    // Logs go to stderr; stdout carries the topology JSON.
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,camera_ingest=debug")),
        )
        .init();

    match Cli::parse().command {
        Commands::Topology(args) => {
            let descriptors = app::render_topology(&args)?;
            println!("{}", serde_json::to_string_pretty(&descriptors)?);
            Ok(())
        }
        Commands::Worker(args) => {
            tracing::info!(stream = %args.stream, scope = %args.store.scope, "Starting worker");
            let code = app::run_worker(args).await?;
            tracing::info!(code, "Worker stopped");
            std::process::exit(code);
        }
    }
}
