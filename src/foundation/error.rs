/// Convenience result type used across the public API.
pub type SourceResult<T> = Result<T, SourceError>;

/// Top-level error type for scene source operations.
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// The scene file does not exist or could not be opened by the renderer.
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// The output directory does not exist.
    #[error("invalid output location: {0}")]
    InvalidOutputLocation(String),

    /// The property name is not recognized.
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// The property value has the wrong type or is outside the declared range.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The requested seek cannot be performed (reverse playback).
    #[error("unsupported seek: {0}")]
    UnsupportedSeek(String),

    /// The external renderer failed to produce a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Buffer production failed while a pipeline was pulling from the source.
    #[error("flow error: {0}")]
    Flow(String),

    /// Configuration (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error (mostly I/O with context).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SourceError {
    /// Build [`SourceError::InvalidLocation`].
    pub fn invalid_location(msg: impl Into<String>) -> Self {
        Self::InvalidLocation(msg.into())
    }

    /// Build [`SourceError::InvalidOutputLocation`].
    pub fn invalid_output_location(msg: impl Into<String>) -> Self {
        Self::InvalidOutputLocation(msg.into())
    }

    /// Build [`SourceError::UnknownProperty`].
    pub fn unknown_property(name: impl Into<String>) -> Self {
        Self::UnknownProperty(name.into())
    }

    /// Build [`SourceError::InvalidValue`].
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Build [`SourceError::UnsupportedSeek`].
    pub fn unsupported_seek(msg: impl Into<String>) -> Self {
        Self::UnsupportedSeek(msg.into())
    }

    /// Build [`SourceError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build [`SourceError::Flow`].
    pub fn flow(msg: impl Into<String>) -> Self {
        Self::Flow(msg.into())
    }

    /// Build [`SourceError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
