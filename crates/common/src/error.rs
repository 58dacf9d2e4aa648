//! Error types shared across Airpoint crates.

/// Top-level error type for Airpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum AirpointError {
    /// A frame reported zero width or height. Usually a disconnected or
    /// misconfigured capture device.
    #[error("Invalid frame dimensions: {width}x{height}")]
    InvalidFrameDimensions { width: u32, height: u32 },

    #[error("Invalid landmarks: {message}")]
    InvalidLandmarks { message: String },

    #[error("Landmark source error: {message}")]
    Source { message: String },

    #[error("Pointer injection error: {message}")]
    Injection { message: String },

    #[error("Notifier error: {message}")]
    Notifier { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Unsupported operation: {message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using AirpointError.
pub type AirpointResult<T> = Result<T, AirpointError>;

impl AirpointError {
    pub fn invalid_frame_dimensions(width: u32, height: u32) -> Self {
        Self::InvalidFrameDimensions { width, height }
    }

    pub fn invalid_landmarks(msg: impl Into<String>) -> Self {
        Self::InvalidLandmarks {
            message: msg.into(),
        }
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn injection(msg: impl Into<String>) -> Self {
        Self::Injection {
            message: msg.into(),
        }
    }

    pub fn notifier(msg: impl Into<String>) -> Self {
        Self::Notifier {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: msg.into(),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported {
            message: msg.into(),
        }
    }

    /// Whether this error ends the control loop.
    ///
    /// Injection and notifier failures are absorbed by the loop; everything
    /// else means there is no frame to process.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Injection { .. } | Self::Notifier { .. })
    }
}
