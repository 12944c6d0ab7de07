// ============================================================================
// Media Pipeline Driver
// ============================================================================
//
// Runs the external media pipeline as a child process and turns its output
// into activity reports for the liveness supervisor. The pipeline itself
// (camera source, muxing, stream store sink) is opaque to this crate.
//
// ============================================================================

pub mod errors;
pub mod runner;

pub use errors::PipelineError;
pub use runner::{run_pipeline, PipelineCommand};
