//! Error types for site validation and splitting.

use serde::Serialize;
use thiserror::Error;

/// Errors raised while checking, validating or processing a building site.
///
/// Geometric variants carry positional indices into the site's building and
/// plateau sequences; their messages are part of the external contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SiteError {
    /// Input is malformed before any geometry is evaluated.
    #[error("{0}")]
    Structural(String),

    #[error("Height plateau {index} has no area.")]
    PlateauNoArea { index: usize },

    #[error("Building limit {index} has no area.")]
    BuildingNoArea { index: usize },

    #[error("Height plateaus do not completely cover building {building}.")]
    IncompleteCoverage { building: usize },

    #[error("Height plateaus {first} and {second} overlap.")]
    PlateauOverlap { first: usize, second: usize },

    /// Every violation found by an accumulating validation pass.
    #[error("{}", join_messages(.0))]
    Invalid(Vec<SiteError>),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for site operations.
pub type SiteResult<T> = Result<T, SiteError>;

fn join_messages(errors: &[SiteError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl SiteError {
    /// HTTP-style status for callers that expose the engine as a service:
    /// 422 for bad input, 500 for failures on our side.
    pub fn status_code(&self) -> u16 {
        match self {
            SiteError::Serialization(_) | SiteError::Internal(_) => 500,
            _ => 422,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            status_code: self.status_code(),
            detail: self.to_string(),
        }
    }
}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        SiteError::Serialization(err.to_string())
    }
}

/// Body handed back across the wasm boundary when an operation fails.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub detail: String,
}
