use thiserror::Error;

pub type Result<T> = std::result::Result<T, KaiwaError>;

#[derive(Debug, Error)]
pub enum KaiwaError {
    #[error("invalid mora at index {index}: {reason}")]
    InvalidMora { index: usize, reason: String },

    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),

    #[error("unknown matcher profile '{0}' (expected default, strict or lenient)")]
    UnknownProfile(String),

    #[error("unknown response selection '{0}' (expected random or least-used)")]
    UnknownSelection(String),

    #[error("catalog entry '{pattern}' has no response variants")]
    EmptyResponses { pattern: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KaiwaError {
    pub(crate) fn invalid_mora(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidMora {
            index,
            reason: reason.into(),
        }
    }
}
