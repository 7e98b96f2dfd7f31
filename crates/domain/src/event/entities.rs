//! Sub-entities attached to an event.
//!
//! Each one is keyed by a URI; the builder keeps at most one member per key.

use common::Uri;
use serde::{Deserialize, Serialize};

/// An agent (person, organization, ...) taking part in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub uri: Uri,
    pub name: Option<String>,
}

impl Participant {
    pub fn new(uri: impl Into<Uri>, name: Option<String>) -> Self {
        Self {
            uri: uri.into(),
            name,
        }
    }
}

/// An article or message posted about an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub uri: Uri,
    pub title: Option<String>,
    pub label: Option<String>,
    /// Display name of the post's creator.
    pub creator: Option<String>,
}

impl Post {
    pub fn new(
        uri: impl Into<Uri>,
        title: Option<String>,
        label: Option<String>,
        creator: Option<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            title,
            label,
            creator,
        }
    }
}

/// A depiction of an event. The depiction URI is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Photo {
    pub depiction: Uri,
}

impl Photo {
    pub fn new(depiction: impl Into<Uri>) -> Self {
        Self {
            depiction: depiction.into(),
        }
    }
}
