//! Domain errors for the library layer.
//!
//! Application edges (CLI, store, HTTP) use `anyhow` with context; the
//! model and parsing code returns these typed errors so callers can match.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("expected goals must be finite and non-negative, got {0}")]
    InvalidExpectedGoals(f64),

    #[error("line {0} is not a valid betting line")]
    InvalidLine(f64),

    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("standard deviation must be positive, got {0}")]
    InvalidStdDev(f64),
}

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("failed to read taxonomy document {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum KambiError {
    #[error("circuit breaker open for {0}")]
    CircuitOpen(String),

    #[error("event {0} not found in offering response")]
    EventNotFound(u64),

    #[error("unexpected response from {endpoint}: {status}")]
    BadStatus { endpoint: String, status: u16 },
}
