/// Result alias that carries the custom [`SquatError`] type.
pub type Result<T> = std::result::Result<T, SquatError>;

/// Common error type for the core crate.
///
/// Missing landmarks and degenerate joint geometry are deliberately absent
/// from this list: the pipeline treats both as "nothing usable this frame"
/// and simply waits for the next one.
#[derive(Debug, thiserror::Error)]
pub enum SquatError {
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed recorded session or configuration file.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Configuration values that would break the counting invariants.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The pose engine could not be initialised or failed during inference.
    /// Fatal for the running session; there is no retry policy.
    #[error("pose engine unavailable: {0}")]
    EngineUnavailable(String),
}

impl SquatError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn engine<T: Into<String>>(msg: T) -> Self {
        Self::EngineUnavailable(msg.into())
    }

    /// Returns true when the error should end the current session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EngineUnavailable(_) | Self::Io(_))
    }
}
