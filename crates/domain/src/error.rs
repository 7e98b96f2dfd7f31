//! Domain error types.

use common::Uri;
use thiserror::Error;

/// Errors raised while opening an event aggregate from a row.
///
/// Both variants are fatal for the reduction run that produced them: an
/// aggregate missing a required field is never handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The row opening an aggregate lacks a required binding.
    #[error(
        "Missing required binding '{field}' for event {}",
        .event.as_ref().map_or("<unknown>", Uri::as_str)
    )]
    MissingRequiredField {
        field: &'static str,
        event: Option<Uri>,
    },

    /// The start time binding is not a recognisable `xsd:dateTime`.
    #[error("Event {event} has an unparseable start time: {value}")]
    InvalidStartTime { event: Uri, value: String },
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, EventError>;
