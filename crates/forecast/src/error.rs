use thiserror::Error;

/// Failures talking to (or decoding) the demand predictor.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The predictor could not be reached, timed out, or answered with a
    /// non-success status.
    #[error("predictor unavailable: {0}")]
    Unavailable(String),

    /// The predictor answered, but the body did not decode as the expected
    /// prediction set.
    #[error("predictor protocol error: {0}")]
    Protocol(String),
}

impl ForecastError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}
