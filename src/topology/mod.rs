// ============================================================================
// Replica Topology
// ============================================================================
//
// Derives worker instance names and backing stream names from a replica
// count and an optional alias. Runs once per deployment render.
//
// Redeploying with the same inputs must produce the same names, so nothing
// in here reads the clock, the environment or any random source.
//
// ============================================================================

pub mod allocator;
pub mod conflicts;
pub mod errors;

pub use allocator::{allocate, ReplicaSpec, TopologyRequest, DEFAULT_STREAM_BASE_NAME};
pub use conflicts::{detect_conflicts, NameConflict};
pub use errors::TopologyError;
