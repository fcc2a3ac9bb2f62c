//! SOAP Fault model.
//!
//! [`Fault`] is the only way this pipeline reports a protocol problem. It is
//! built by the parser on structural violations and by the header dispatcher
//! when a mandatory header is not understood; callers turn it into a
//! protocol-visible fault response.

use crate::normalize::{normalize_uri, strip_to_word};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Top-level SOAP fault codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PrimeCode {
    VersionMismatch,
    MustUnderstand,
    DataEncodingUnknown,
    /// Problem with the request as sent
    #[default]
    Sender,
    /// Problem on the processing side
    Receiver,
}

impl PrimeCode {
    /// Canonical spelling of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VersionMismatch => "VersionMismatch",
            Self::MustUnderstand => "MustUnderstand",
            Self::DataEncodingUnknown => "DataEncodingUnknown",
            Self::Sender => "Sender",
            Self::Receiver => "Receiver",
        }
    }

    /// Case-insensitive lookup of a prime code.
    ///
    /// Returns `None` for anything outside the five known codes.
    pub fn translate(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "versionmismatch" => Some(Self::VersionMismatch),
            "mustunderstand" => Some(Self::MustUnderstand),
            "dataencodingunknown" => Some(Self::DataEncodingUnknown),
            "sender" => Some(Self::Sender),
            "receiver" => Some(Self::Receiver),
            _ => None,
        }
    }
}

impl fmt::Display for PrimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized SOAP fault.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{prime_code}: {message}")]
pub struct Fault {
    message: String,
    prime_code: PrimeCode,
    sub_codes: Vec<String>,
    role: Option<String>,
    details: Map<String, Value>,
}

impl Fault {
    /// Create a fault.
    ///
    /// `prime_code` is matched case-insensitively; unknown or empty input
    /// becomes [`PrimeCode::Sender`]. Each sub code is reduced to word
    /// characters and dropped if nothing is left. Order and duplicates are
    /// kept.
    pub fn new<I, S>(message: impl Into<String>, prime_code: &str, sub_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sub_codes = sub_codes
            .into_iter()
            .map(|code| strip_to_word(code.as_ref()))
            .filter(|code| !code.is_empty())
            .collect();

        Self {
            message: message.into(),
            prime_code: PrimeCode::translate(prime_code).unwrap_or_default(),
            sub_codes,
            role: None,
            details: Map::new(),
        }
    }

    /// Pure prime code lookup, see [`PrimeCode::translate`].
    pub fn translate_prime_code(code: &str) -> Option<PrimeCode> {
        PrimeCode::translate(code)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn prime_code(&self) -> PrimeCode {
        self.prime_code
    }

    pub fn sub_codes(&self) -> &[String] {
        &self.sub_codes
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    /// Set the role the fault is reported for.
    ///
    /// The role is URI-normalized; a blank or absent role clears it.
    pub fn set_role(&mut self, role: Option<&str>) {
        self.role = role.map(normalize_uri).filter(|role| !role.is_empty());
    }

    /// Replace the fault details wholesale.
    pub fn set_details(&mut self, details: Map<String, Value>) {
        self.details = details;
    }

    pub fn with_role(mut self, role: Option<&str>) -> Self {
        self.set_role(role);
        self
    }

    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.set_details(details);
        self
    }
}
