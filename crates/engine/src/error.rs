use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input shape at position {position}: {reason}")]
    InvalidInputShape { position: usize, reason: String },

    #[error("Invalid policy tables: {0}")]
    InvalidPolicy(String),
}

impl EngineError {
    /// Create an invalid input shape error.
    pub fn invalid_shape(position: usize, reason: impl Into<String>) -> Self {
        Self::InvalidInputShape {
            position,
            reason: reason.into(),
        }
    }

    /// Create an invalid policy error.
    pub fn invalid_policy(reason: impl Into<String>) -> Self {
        Self::InvalidPolicy(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
