//! Errors as the API reports them.

use std::fmt;

use crate::error::Error;

/// The status used for any error that does not carry its own.
pub const INTERNAL_SERVER_ERROR: u16 = 500;

const BAD_REQUEST: u16 = 400;

/// An error that can be rendered into an [`ErrorDocument`].
///
/// The message is the error's `Display` output. Errors without a status code
/// count as unexpected server faults.
pub trait ResponseError: fmt::Display {
    fn status_code(&self) -> Option<u16> {
        None
    }
}

/// The body written for an error: `{"status": ..., "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDocument {
    pub status: u16,
    pub message: String,
}

impl ErrorDocument {
    pub fn from_error<E: ResponseError + ?Sized>(exc: &E) -> Self {
        ErrorDocument {
            status: exc.status_code().unwrap_or(INTERNAL_SERVER_ERROR),
            message: exc.to_string(),
        }
    }

    /// Encodes the document as JSON text. Cannot fail.
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "status": self.status,
            "message": self.message,
        })
        .to_string()
    }
}

/// A general purpose API error with an optional status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: Option<u16>,
    message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        ApiError {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_status(404, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_status(403, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> Option<u16> {
        self.status
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> Option<u16> {
        match self {
            Error::TimestampFormat { .. } | Error::BooleanFormat { .. } => Some(BAD_REQUEST),
            Error::SerializationInput(_) | Error::Encoding(_) | Error::TimestampRange { .. } => {
                None
            }
        }
    }
}

impl ResponseError for serde_json::Error {}

impl ResponseError for std::io::Error {}
