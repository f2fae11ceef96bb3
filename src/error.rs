/// Errors raised by the noise engine and its exporters.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NoiseError {
    /// A construction parameter was out of range. Raised eagerly so a bad
    /// configuration never reaches a query.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NoiseError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        NoiseError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
