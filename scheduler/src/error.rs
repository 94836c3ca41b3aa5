/// Errors produced while configuring or running a simulation
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Parameters rejected before the first tick
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The engine reached a state that must never happen; the run is aborted
    #[error("scheduler invariant violated: {0}")]
    Invariant(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn invariant(message: impl Into<String>) -> SimError {
        SimError::Invariant(message.into())
    }
}
