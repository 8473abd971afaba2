/// Convenience result type used across the engine.
pub type OnairResult<T> = Result<T, OnairError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only construction-time misuse ([`OnairError::Validation`]) and resource
/// allocation failure ([`OnairError::Resource`]) are surfaced to callers of
/// the frame pipeline; decode- and producer-level failures are converted into
/// end-of-stream or no-contribution signals so playout never halts.
#[derive(thiserror::Error, Debug)]
pub enum OnairError {
    /// Invalid construction arguments or descriptor data.
    #[error("validation error: {0}")]
    Validation(String),

    /// GPU resource allocation or device failure. Fatal for the affected frame.
    #[error("resource error: {0}")]
    Resource(String),

    /// A single packet failed to decode. Recovered locally, never propagated
    /// past the decode pipeline.
    #[error("decode error: {0}")]
    Decode(String),

    /// The requested operation is not supported by this frame variant.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OnairError {
    /// Build an [`OnairError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`OnairError::Resource`] value.
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build an [`OnairError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build an [`OnairError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
