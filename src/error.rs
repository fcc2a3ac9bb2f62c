//! Error types for the SOAP dispatch pipeline.
//!
//! Protocol-level failures are always a [`Fault`]. Everything that happens
//! before a SOAP message exists (reading, XML parsing, registration mistakes)
//! is a [`SoapError`].

use crate::fault::Fault;
use thiserror::Error;

/// Non-protocol errors: intake, registration and configuration.
#[derive(Error, Debug)]
pub enum SoapError {
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("XXE attack detected: {0}")]
    XxeDetected(String),

    #[error("Document too large: {size} bytes exceeds maximum {max}")]
    DocumentTooLarge { size: usize, max: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of a failed dispatch pass.
///
/// A [`Fault`] comes from the pipeline itself (structural validation or an
/// unmet MustUnderstand header). Errors returned by handlers are carried
/// through untouched in [`DispatchError::Handler`].
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Fault(#[from] Fault),

    #[error(transparent)]
    Handler(anyhow::Error),
}

impl DispatchError {
    /// The fault behind this error, if any.
    ///
    /// Handlers may return a [`Fault`] themselves; it is found here as well.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Fault(fault) => Some(fault),
            Self::Handler(err) => err.downcast_ref::<Fault>(),
        }
    }

    /// Whether the error originated in a handler.
    pub fn is_handler_error(&self) -> bool {
        matches!(self, Self::Handler(_))
    }
}
