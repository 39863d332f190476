//! Error types for the AcuityData client.
//!
//! # Design
//! Transport failures are returned as the transport's own error type and HTTP
//! error statuses come back as ordinary envelopes, so no client operation
//! currently produces an `Error`. The type exists so the public API has a
//! stable name for library-level failures.

use std::fmt;

/// Library-level error. Not returned by any operation yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    message: String,
}

impl Error {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "acuitydata: {}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed() {
        let err = Error::new("boom");
        assert_eq!(err.to_string(), "acuitydata: boom");
        assert_eq!(err.message(), "boom");
    }
}
