// ============================================================================
// Stream Target
// ============================================================================
//
// Connection parameters for the external stream store client. The worker
// never talks to the store itself; these values are validated and then
// handed to the pipeline process as environment variables.
//
// ============================================================================

pub mod descriptor;
pub mod errors;
pub mod value_objects;

pub use descriptor::{StreamTarget, WorkerDescriptor, DEFAULT_CONTROLLER};
pub use errors::StreamTargetError;
pub use value_objects::{RetentionPolicy, RetentionType, ScopedStream};
