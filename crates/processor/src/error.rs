//! Processor error types.

use thiserror::Error;

/// Misuse of a reducer's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("row submitted after the reduction finished")]
    SubmitAfterFinish,

    #[error("reduction finished twice")]
    FinishedTwice,

    /// A fatal error already ended this reduction.
    #[error("reduction was aborted by an earlier error")]
    Aborted,
}

/// Errors that can occur while reducing rows into events.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// A row could not open an event aggregate. Fatal for the run.
    #[error("Event error: {0}")]
    Event(#[from] domain::EventError),

    /// The reducer was driven outside its lifecycle.
    #[error("Usage error: {0}")]
    Usage(#[from] UsageError),

    /// Rows could not be fetched. No row of the run reached the reducer.
    #[error("SPARQL error: {0}")]
    Sparql(#[from] sparql::SparqlError),
}

/// Result type for processor operations.
pub type Result<T> = std::result::Result<T, ProcessorError>;
