use std::fmt::Display;

use serde::ser;
use thiserror::Error;

/// A convenient alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or encoding documents.
#[derive(Debug, Error)]
pub enum Error {
    /// A value handed to [`to_value`](crate::ser::to_value) could not be turned into a [`Value`](crate::Value).
    #[error("serialization input error: {0}")]
    SerializationInput(String),

    /// The JSON encoder rejected the document, usually because a decimal,
    /// timestamp or set reached it without being normalized first, or a
    /// float was not finite.
    #[error("failed to encode document: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Text did not match `YYYY-MM-DD HH:MM:SS.ffffff`.
    #[error("time data {input:?} does not match format \"YYYY-MM-DD HH:MM:SS.ffffff\"")]
    TimestampFormat { input: String },

    /// A timestamp whose year does not fit the four digit wire format.
    #[error("timestamp {timestamp} has a year outside 0000-9999")]
    TimestampRange { timestamp: chrono::NaiveDateTime },

    /// A string other than "true" or "false" where a boolean was expected.
    #[error("a boolean value accepted as a string must be either \"true\" or \"false\", got {input:?}")]
    BooleanFormat { input: String },
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::SerializationInput(msg.to_string())
    }
}
