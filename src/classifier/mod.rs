//! Remote sentiment classification: the only network collaborator.
//!
//! The classifier itself (model, inference) lives behind an HTTP endpoint
//! that is out of scope. This module owns the client side of that contract:
//!
//! - [`protocol`]: request/response bodies and their interpretation
//! - [`client`]: a blocking `ureq` client for the `/predict` endpoint
//!
//! The analyzer only depends on the [`Classify`] trait so tests can swap in
//! a scripted classifier.
pub mod client;
pub mod protocol;

use thiserror::Error;

use crate::model::AnalysisResult;

pub use client::ClassifierClient;

/// Any failure of a classification request.
///
/// Every variant is surfaced to the user as the same generic notice; the
/// variants exist for the event log and debugging output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The endpoint answered with a non-2xx status.
    #[error("endpoint returned HTTP {status}")]
    Status {
        status: u16,
        /// `error` field of the response body, when present.
        detail: Option<String>,
    },
    /// Well-formed body with `"success": false`.
    #[error("endpoint reported an unsuccessful analysis")]
    Unsuccessful { detail: Option<String> },
    /// Body could not be interpreted as a classification.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RequestError {
    /// Extra detail reported by the endpoint, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } | Self::Unsuccessful { detail } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Something that can classify a review.
pub trait Classify {
    /// Issue exactly one classification attempt for `text`.
    fn classify(&self, text: &str) -> Result<AnalysisResult, RequestError>;
}
