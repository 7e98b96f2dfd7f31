use thiserror::Error;

/// Errors raised while building query text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Additional constraints are spliced into the where-clause and followed
    /// by a terminator, so they must not carry their own.
    #[error("Additional constraints must not end with '.': {0}")]
    TrailingTerminator(String),

    /// The event URI cannot be written as an IRI reference.
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

/// Errors that can occur when querying an endpoint.
#[derive(Debug, Error)]
pub enum SparqlError {
    /// The request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("Endpoint error (status {status}): {body}")]
    Status { status: u16, body: String },

    /// The response body is not a SPARQL JSON result set.
    #[error("Result parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The query text could not be built.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),
}

impl From<reqwest::Error> for SparqlError {
    fn from(err: reqwest::Error) -> Self {
        SparqlError::Network(err.to_string())
    }
}

/// Result type for endpoint operations.
pub type Result<T> = std::result::Result<T, SparqlError>;
