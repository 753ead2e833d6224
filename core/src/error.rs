use thiserror::Error;

use crate::vehicle::VehicleField;

/// Error type for turning a raw vehicle profile into typed values.
#[derive(Error, Debug, Clone, PartialEq, uniffi::Error)]
pub enum VehicleProfileError {
    #[error("unknown field: {name}")]
    UnknownField { name: String },

    #[error("{field} is required")]
    MissingValue { field: VehicleField },

    #[error("{field} is not a number: '{value}'")]
    NotANumber { field: VehicleField, value: String },

    #[error("{field} must be a whole number, got {value}")]
    NotAnInteger { field: VehicleField, value: f64 },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: VehicleField,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} has no option '{value}'")]
    UnknownOption { field: VehicleField, value: String },
}

/// Error type for the user store boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("action already exists: {0}")]
    DuplicateAction(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Error type for dashboard operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoggerError {
    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("date {0} is in the future")]
    DateInFuture(chrono::NaiveDate),

    #[error("no delete pending")]
    NoPendingDelete,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error type for voice capture sessions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoiceError {
    #[error("already listening")]
    AlreadyListening,

    #[error("speech backend failed: {0}")]
    Backend(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("recent_limit must be at least 1")]
    ZeroRecentLimit,
}
