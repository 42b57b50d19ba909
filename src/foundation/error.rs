/// Convenience result type used across the crate.
pub type NeoResult<T> = Result<T, NeoError>;

/// Top-level error taxonomy for the report pipeline.
///
/// Per-record extraction problems are not errors: those records are dropped by
/// [`crate::normalize_record`]. Everything listed here aborts the run.
#[derive(thiserror::Error, Debug)]
pub enum NeoError {
    /// Invalid input data or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// The feed endpoint answered with something other than a usable feed.
    #[error("feed error: {0}")]
    Feed(String),

    /// Errors while composing the report image.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NeoError {
    /// Build a [`NeoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`NeoError::Feed`] value.
    pub fn feed(msg: impl Into<String>) -> Self {
        Self::Feed(msg.into())
    }

    /// Build a [`NeoError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`NeoError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
