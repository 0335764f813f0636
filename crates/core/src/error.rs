/// Result alias that carries the custom [`ToneError`] type.
pub type Result<T> = std::result::Result<T, ToneError>;

/// Common error type for the core crate.
///
/// Every variant except [`ToneError::Stream`] is raised during startup and is
/// fatal for the binary.
#[derive(Debug, thiserror::Error)]
pub enum ToneError {
    /// The audio host came up without a usable output device.
    #[error("audio subsystem failed to start: {0}")]
    AudioInit(String),
    /// The output stream could not be opened with the requested parameters.
    #[error("failed to open audio device: {0}")]
    DeviceOpen(String),
    /// The platform keyboard state facility is unavailable.
    #[error("input subsystem failed to start: {0}")]
    InputInit(String),
    /// The backend refused a play or pause request.
    #[error("audio stream control failed: {0}")]
    Stream(String),
    /// A configuration value or argument is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Offline pitch analysis could not run on the rendered block.
    #[error("analysis failed: {0}")]
    Analysis(String),
    /// Wrapper around JSON serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl ToneError {
    /// Shorthand for an [`ToneError::InvalidConfig`] with the given message.
    pub fn invalid_config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<cpal::DevicesError> for ToneError {
    fn from(value: cpal::DevicesError) -> Self {
        Self::AudioInit(value.to_string())
    }
}

impl From<cpal::BuildStreamError> for ToneError {
    fn from(value: cpal::BuildStreamError) -> Self {
        Self::DeviceOpen(value.to_string())
    }
}

impl From<cpal::PlayStreamError> for ToneError {
    fn from(value: cpal::PlayStreamError) -> Self {
        Self::Stream(value.to_string())
    }
}

impl From<cpal::PauseStreamError> for ToneError {
    fn from(value: cpal::PauseStreamError) -> Self {
        Self::Stream(value.to_string())
    }
}

impl From<realfft::FftError> for ToneError {
    fn from(value: realfft::FftError) -> Self {
        Self::Analysis(value.to_string())
    }
}
