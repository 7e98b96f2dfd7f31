//! Event aggregate.

use chrono::{DateTime, Utc};
use common::Uri;
use serde::Serialize;

use super::{Participant, Photo, Post};

/// A fully merged event.
///
/// Built by [`EventBuilder`](super::EventBuilder) from every row that shares
/// the event's URI. Once finalized an event is never mutated; sinks receive
/// it by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub(crate) uri: Uri,
    pub(crate) name: String,
    pub(crate) start: DateTime<Utc>,
    pub(crate) address: String,
    pub(crate) logo: Option<String>,
    pub(crate) end: Option<DateTime<Utc>>,
    pub(crate) description: Option<String>,
    pub(crate) homepage: Option<String>,
    pub(crate) place: Option<String>,
    pub(crate) participants: Vec<Participant>,
    pub(crate) posts: Vec<Post>,
    pub(crate) photos: Vec<Photo>,
}

// Query methods
impl Event {
    /// Returns the event URI, its identity key.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the start instant.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the full address of the event site.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the location name, which is the site's address.
    pub fn location_name(&self) -> &str {
        &self.address
    }

    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref()
    }

    /// Returns the name of the place hosting the event, if known.
    pub fn place(&self) -> Option<&str> {
        self.place.as_deref()
    }

    /// Returns participants in first-seen order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Returns posts in first-seen order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Returns photos in first-seen order.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Returns true if the event starts strictly before `instant`.
    pub fn starts_before(&self, instant: DateTime<Utc>) -> bool {
        self.start < instant
    }
}
