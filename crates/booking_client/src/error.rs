use std::time::Duration;

use shared::{error::RpcFailure, protocol::EnvelopeError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote call did not produce a usable result.
    NetworkFailure,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("booking service request failed: {0}")]
    Transport(String),
    #[error("booking service returned HTTP {status} for {path}")]
    Status { status: u16, path: String },
    #[error("booking service rejected the call ({code}): {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed booking service response: {0}")]
    MalformedEnvelope(String),
    #[error("booking service did not answer within {0:?}")]
    Timeout(Duration),
    #[error("booking service is unavailable")]
    Unavailable,
    #[error("invalid booking server url '{0}'")]
    InvalidServerUrl(String),
}

impl BookingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_)
            | Self::Status { .. }
            | Self::Rpc { .. }
            | Self::MalformedEnvelope(_)
            | Self::Timeout(_)
            | Self::Unavailable
            | Self::InvalidServerUrl(_) => ErrorKind::NetworkFailure,
        }
    }

    /// Short text suitable for an inline indicator next to a field.
    pub fn indicator(&self) -> String {
        match self {
            Self::Timeout(_) => "The booking service took too long to answer; try again.".to_string(),
            Self::Rpc { message, .. } => format!("The booking service reported an error: {message}"),
            Self::Unavailable | Self::InvalidServerUrl(_) => {
                "The booking service is not configured.".to_string()
            }
            _ => "Could not reach the booking service; try again.".to_string(),
        }
    }
}

impl From<RpcFailure> for BookingError {
    fn from(value: RpcFailure) -> Self {
        Self::Rpc {
            code: value.code,
            message: value.detail().to_string(),
        }
    }
}

impl From<EnvelopeError> for BookingError {
    fn from(value: EnvelopeError) -> Self {
        match value {
            EnvelopeError::Rpc(failure) => failure.into(),
            EnvelopeError::Malformed(reason) => Self::MalformedEnvelope(reason),
        }
    }
}

impl From<reqwest::Error> for BookingError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::MalformedEnvelope(value.to_string())
        } else {
            Self::Transport(value.to_string())
        }
    }
}
