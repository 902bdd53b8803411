use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    SensorUnavailable,
    SensorDenied,
    Transport,
    Protocol,
    Internal,
}

/// Serializable fault surfaced to engine consumers through events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineFault {
    pub code: ErrorCode,
    pub message: String,
}

impl EngineFault {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct EngineError {
    pub code: ErrorCode,
    pub message: String,
}

impl EngineError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<EngineError> for EngineFault {
    fn from(value: EngineError) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}
