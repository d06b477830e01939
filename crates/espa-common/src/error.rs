//! Error types for the ESPA geolocation and land/water mask crates.

use thiserror::Error;

/// Result type alias using EspaError.
pub type EspaResult<T> = Result<T, EspaError>;

/// Broad failure classes. Every error is reported to the immediate caller,
/// which aborts the current top-level operation; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or out-of-range input.
    Validation,
    /// A forward or inverse transform rejected a coordinate.
    ProjectionFailure,
    /// File open/read/seek/write failure or malformed binary records.
    Io,
    /// Memory exhaustion.
    Allocation,
    /// A metadata element is present under the wrong projection type.
    SchemaMismatch,
}

/// Primary error type for geolocation, projection and mask operations.
#[derive(Debug, Error)]
pub enum EspaError {
    // === Validation Errors ===
    #[error("Invalid angle: {0}")]
    InvalidAngle(String),

    #[error("Unsupported projection: {0}")]
    UnsupportedProjection(String),

    #[error("Unsupported datum: {0}")]
    UnsupportedDatum(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Fill coordinate passed to {0}")]
    FillInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // === Transform Errors ===
    #[error("Projection failure: {0}")]
    ProjectionFailure(String),

    // === Resource Errors ===
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Allocation failed: {0}")]
    Allocation(String),

    // === Metadata Errors ===
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl EspaError {
    /// Create an InvalidAngle error.
    pub fn invalid_angle(msg: impl Into<String>) -> Self {
        Self::InvalidAngle(msg.into())
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidGeometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Create a ProjectionFailure error.
    pub fn projection_failure(msg: impl Into<String>) -> Self {
        Self::ProjectionFailure(msg.into())
    }

    /// Create an Io error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Create a SchemaMismatch error.
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    /// Get the taxonomy class for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            EspaError::ProjectionFailure(_) => ErrorCategory::ProjectionFailure,
            EspaError::Io(_) => ErrorCategory::Io,
            EspaError::Allocation(_) => ErrorCategory::Allocation,
            EspaError::SchemaMismatch(_) => ErrorCategory::SchemaMismatch,
            _ => ErrorCategory::Validation,
        }
    }

    /// True for malformed or out-of-range input.
    pub fn is_validation(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }
}

impl From<std::io::Error> for EspaError {
    fn from(err: std::io::Error) -> Self {
        EspaError::Io(err.to_string())
    }
}

impl From<std::collections::TryReserveError> for EspaError {
    fn from(err: std::collections::TryReserveError) -> Self {
        EspaError::Allocation(err.to_string())
    }
}

impl From<serde_yaml::Error> for EspaError {
    fn from(err: serde_yaml::Error) -> Self {
        EspaError::InvalidMetadata(format!("YAML error: {}", err))
    }
}
