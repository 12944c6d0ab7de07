#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Pipeline command cannot be empty")]
    EmptyCommand,

    #[error("Failed to spawn pipeline '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Pipeline stdout was not captured")]
    MissingStdout,

    #[error("Failed to read pipeline output: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to wait for pipeline exit: {0}")]
    Wait(#[source] std::io::Error),
}
