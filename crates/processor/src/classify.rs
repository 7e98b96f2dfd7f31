//! Past / next / future classification.

use chrono::{DateTime, Utc};
use domain::Event;
use serde::Serialize;

/// Where an event falls relative to the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// Started before the reference instant.
    Past,
    /// The first event at or after the reference instant.
    Next,
    /// Every later event at or after the reference instant.
    Future,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Past => "past",
            Bucket::Next => "next",
            Bucket::Future => "future",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies events arriving in ascending start-time order.
///
/// The next slot is awarded at most once per classifier, so one classifier
/// must be used for exactly one reduction run.
#[derive(Debug, Clone)]
pub struct Classifier {
    reference: DateTime<Utc>,
    next_consumed: bool,
}

impl Classifier {
    pub fn new(reference: DateTime<Utc>) -> Self {
        Self {
            reference,
            next_consumed: false,
        }
    }

    /// Returns the reference instant.
    pub fn reference(&self) -> DateTime<Utc> {
        self.reference
    }

    /// Returns true once an event has been classified as [`Bucket::Next`].
    pub fn next_consumed(&self) -> bool {
        self.next_consumed
    }

    /// Classifies `event`. An event starting exactly at the reference instant
    /// is never past.
    pub fn classify(&mut self, event: &Event) -> Bucket {
        if event.starts_before(self.reference) {
            Bucket::Past
        } else if !self.next_consumed {
            self.next_consumed = true;
            Bucket::Next
        } else {
            Bucket::Future
        }
    }
}
