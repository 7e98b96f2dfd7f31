//! Row-merging builder for the event aggregate.

use chrono::{DateTime, Utc};
use common::{Row, Uri, bindings};
use indexmap::IndexMap;

use super::{Event, Participant, Photo, Post, parse_instant};
use crate::{EventError, Result};

/// Accumulates the rows describing one event.
///
/// Merge policies:
/// - optional scalars: the first bound value wins, later rows never overwrite
/// - participants, posts, photos: the first member with a given URI wins,
///   later members with the same URI are dropped
///
/// The builder is consumed by [`finalize`](Self::finalize), so a finished
/// aggregate cannot be changed.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    uri: Uri,
    name: String,
    start: DateTime<Utc>,
    address: String,
    logo: Option<String>,
    end: Option<DateTime<Utc>>,
    description: Option<String>,
    homepage: Option<String>,
    place: Option<String>,
    participants: IndexMap<Uri, Participant>,
    posts: IndexMap<Uri, Post>,
    photos: IndexMap<Uri, Photo>,
    rows_merged: usize,
}

impl EventBuilder {
    /// Opens an aggregate for `uri` from the first row describing it.
    ///
    /// Fails if the row lacks the name, start time or address binding, or
    /// if the start time cannot be parsed. The row's optional values and
    /// sub-entities are merged as by [`merge_row`](Self::merge_row).
    pub fn create(uri: Uri, row: &Row) -> Result<Self> {
        let name = required(&uri, row, bindings::ITEM_LABEL)?;
        let raw_start = required(&uri, row, bindings::TIME_START)?;
        let address = required(&uri, row, bindings::ADDRESS)?;

        let start = parse_instant(raw_start).ok_or_else(|| EventError::InvalidStartTime {
            event: uri.clone(),
            value: raw_start.to_string(),
        })?;

        let mut builder = Self {
            name: name.to_string(),
            start,
            address: address.to_string(),
            logo: None,
            end: None,
            description: None,
            homepage: None,
            place: None,
            participants: IndexMap::new(),
            posts: IndexMap::new(),
            photos: IndexMap::new(),
            rows_merged: 0,
            uri,
        };
        builder.merge_row(row);
        Ok(builder)
    }

    /// Returns the URI of the event being built.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the number of rows merged so far, including the opening row.
    pub fn rows_merged(&self) -> usize {
        self.rows_merged
    }

    /// Merges another row describing the same event.
    pub fn merge_row(&mut self, row: &Row) {
        self.rows_merged += 1;

        fill(&mut self.logo, row, bindings::LOGO);
        fill(&mut self.description, row, bindings::DESCRIPTION);
        fill(&mut self.homepage, row, bindings::HOMEPAGE);
        fill(&mut self.place, row, bindings::EVENT_PLACE);

        if self.end.is_none()
            && let Some(raw) = row.get(bindings::TIME_END)
        {
            match parse_instant(raw) {
                Some(end) => self.end = Some(end),
                None => {
                    tracing::warn!(event = %self.uri, value = raw, "ignoring unparseable end time")
                }
            }
        }

        if let Some(agent) = row.get(bindings::AGENT) {
            let participant = Participant::new(agent, owned(row, bindings::PARTICIPANT_NAME));
            self.participants
                .entry(participant.uri.clone())
                .or_insert(participant);
        }

        if let Some(post) = row.get(bindings::POST) {
            let post = Post::new(
                post,
                owned(row, bindings::POST_TITLE),
                owned(row, bindings::POST_LABEL),
                owned(row, bindings::POST_CREATOR),
            );
            self.posts.entry(post.uri.clone()).or_insert(post);
        }

        if let Some(depiction) = row.get(bindings::DEPICTION) {
            let photo = Photo::new(depiction);
            self.photos.entry(photo.depiction.clone()).or_insert(photo);
        }
    }

    /// Freezes the builder into an immutable [`Event`].
    pub fn finalize(self) -> Event {
        tracing::trace!(
            event = %self.uri,
            rows = self.rows_merged,
            participants = self.participants.len(),
            posts = self.posts.len(),
            photos = self.photos.len(),
            "event finalized"
        );

        Event {
            uri: self.uri,
            name: self.name,
            start: self.start,
            address: self.address,
            logo: self.logo,
            end: self.end,
            description: self.description,
            homepage: self.homepage,
            place: self.place,
            participants: self.participants.into_values().collect(),
            posts: self.posts.into_values().collect(),
            photos: self.photos.into_values().collect(),
        }
    }
}

fn required<'r>(uri: &Uri, row: &'r Row, field: &'static str) -> Result<&'r str> {
    row.get(field).ok_or_else(|| EventError::MissingRequiredField {
        field,
        event: Some(uri.clone()),
    })
}

fn owned(row: &Row, name: &str) -> Option<String> {
    row.get(name).map(str::to_string)
}

fn fill(slot: &mut Option<String>, row: &Row, name: &str) {
    if slot.is_none() {
        *slot = owned(row, name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_row() -> Row {
        Row::new()
            .with(bindings::ITEM, "urn:event:a")
            .with(bindings::ITEM_LABEL, "Open Data Day")
            .with(bindings::TIME_START, "2020-03-07T09:30:00Z")
            .with(bindings::ADDRESS, "Via Roma 1, Catania")
    }

    fn uri() -> Uri {
        Uri::from("urn:event:a")
    }

    #[test]
    fn create_reads_required_fields() {
        let event = EventBuilder::create(uri(), &base_row()).unwrap().finalize();

        assert_eq!(event.uri().as_str(), "urn:event:a");
        assert_eq!(event.name(), "Open Data Day");
        assert_eq!(
            event.start(),
            Utc.with_ymd_and_hms(2020, 3, 7, 9, 30, 0).unwrap()
        );
        assert_eq!(event.address(), "Via Roma 1, Catania");
        assert_eq!(event.location_name(), "Via Roma 1, Catania");
        assert!(event.logo().is_none());
        assert!(event.participants().is_empty());
    }

    #[test]
    fn create_fails_without_start_time() {
        let row = Row::new()
            .with(bindings::ITEM_LABEL, "Open Data Day")
            .with(bindings::ADDRESS, "Via Roma 1");

        let err = EventBuilder::create(uri(), &row).unwrap_err();
        assert_eq!(
            err,
            EventError::MissingRequiredField {
                field: bindings::TIME_START,
                event: Some(uri()),
            }
        );
    }

    #[test]
    fn create_fails_without_name_or_address() {
        let no_name = Row::new()
            .with(bindings::TIME_START, "2020-01-01T00:00:00Z")
            .with(bindings::ADDRESS, "x");
        assert!(matches!(
            EventBuilder::create(uri(), &no_name),
            Err(EventError::MissingRequiredField {
                field: bindings::ITEM_LABEL,
                ..
            })
        ));

        let no_address = Row::new()
            .with(bindings::ITEM_LABEL, "x")
            .with(bindings::TIME_START, "2020-01-01T00:00:00Z");
        assert!(matches!(
            EventBuilder::create(uri(), &no_address),
            Err(EventError::MissingRequiredField {
                field: bindings::ADDRESS,
                ..
            })
        ));
    }

    #[test]
    fn create_rejects_unparseable_start() {
        let row = base_row().with(bindings::TIME_START, "soon");
        assert_eq!(
            EventBuilder::create(uri(), &row).unwrap_err(),
            EventError::InvalidStartTime {
                event: uri(),
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn opening_row_contributes_relations() {
        let row = base_row()
            .with(bindings::AGENT, "urn:agent:1")
            .with(bindings::PARTICIPANT_NAME, "Alice")
            .with(bindings::POST, "urn:post:1")
            .with(bindings::POST_TITLE, "Recap")
            .with(bindings::DEPICTION, "http://img/1.png");

        let event = EventBuilder::create(uri(), &row).unwrap().finalize();

        assert_eq!(
            event.participants(),
            &[Participant::new("urn:agent:1", Some("Alice".into()))]
        );
        assert_eq!(
            event.posts(),
            &[Post::new("urn:post:1", Some("Recap".into()), None, None)]
        );
        assert_eq!(event.photos(), &[Photo::new("http://img/1.png")]);
    }

    #[test]
    fn duplicate_participant_is_dropped() {
        let mut builder = EventBuilder::create(
            uri(),
            &base_row().with(bindings::AGENT, "urn:agent:1"),
        )
        .unwrap();

        builder.merge_row(&base_row().with(bindings::AGENT, "urn:agent:1"));
        builder.merge_row(&base_row().with(bindings::AGENT, "urn:agent:2"));

        let event = builder.finalize();
        let uris: Vec<_> = event.participants().iter().map(|p| p.uri.as_str()).collect();
        assert_eq!(uris, vec!["urn:agent:1", "urn:agent:2"]);
    }

    #[test]
    fn first_participant_occurrence_wins() {
        let mut builder = EventBuilder::create(
            uri(),
            &base_row().with(bindings::AGENT, "urn:agent:1"),
        )
        .unwrap();
        builder.merge_row(
            &base_row()
                .with(bindings::AGENT, "urn:agent:1")
                .with(bindings::PARTICIPANT_NAME, "Late Name"),
        );

        let event = builder.finalize();
        assert_eq!(event.participants().len(), 1);
        assert_eq!(event.participants()[0].name, None);
    }

    #[test]
    fn duplicate_photo_is_dropped() {
        let mut builder = EventBuilder::create(
            uri(),
            &base_row().with(bindings::DEPICTION, "http://img/1.png"),
        )
        .unwrap();
        builder.merge_row(&base_row().with(bindings::DEPICTION, "http://img/1.png"));

        let event = builder.finalize();
        assert_eq!(event.photos().len(), 1);
        assert_eq!(event.photos()[0].depiction.as_str(), "http://img/1.png");
    }

    #[test]
    fn first_post_occurrence_wins() {
        let mut builder = EventBuilder::create(
            uri(),
            &base_row()
                .with(bindings::POST, "urn:post:1")
                .with(bindings::POST_TITLE, "first"),
        )
        .unwrap();
        builder.merge_row(
            &base_row()
                .with(bindings::POST, "urn:post:1")
                .with(bindings::POST_TITLE, "second"),
        );

        let event = builder.finalize();
        assert_eq!(event.posts().len(), 1);
        assert_eq!(event.posts()[0].title.as_deref(), Some("first"));
    }

    #[test]
    fn one_row_feeds_several_relations() {
        let mut builder = EventBuilder::create(uri(), &base_row()).unwrap();
        builder.merge_row(
            &base_row()
                .with(bindings::AGENT, "urn:agent:1")
                .with(bindings::POST, "urn:post:1")
                .with(bindings::DEPICTION, "http://img/1.png"),
        );
        builder.merge_row(
            &base_row()
                .with(bindings::POST, "urn:post:1")
                .with(bindings::DEPICTION, "http://img/2.png"),
        );

        let event = builder.finalize();
        assert_eq!(event.participants().len(), 1);
        assert_eq!(event.posts().len(), 1);
        assert_eq!(event.photos().len(), 2);
    }

    #[test]
    fn optional_scalars_keep_first_value() {
        let mut builder = EventBuilder::create(uri(), &base_row()).unwrap();
        builder.merge_row(
            &base_row()
                .with(bindings::DESCRIPTION, "first")
                .with(bindings::EVENT_PLACE, "Aula Magna"),
        );
        builder.merge_row(
            &base_row()
                .with(bindings::DESCRIPTION, "second")
                .with(bindings::HOMEPAGE, "http://example.org"),
        );

        let event = builder.finalize();
        assert_eq!(event.description(), Some("first"));
        assert_eq!(event.place(), Some("Aula Magna"));
        assert_eq!(event.homepage(), Some("http://example.org"));
    }

    #[test]
    fn required_scalars_come_from_opening_row() {
        let mut builder = EventBuilder::create(uri(), &base_row()).unwrap();
        builder.merge_row(&base_row().with(bindings::ITEM_LABEL, "Renamed"));
        assert_eq!(builder.finalize().name(), "Open Data Day");
    }

    #[test]
    fn unparseable_end_time_is_ignored_until_valid() {
        let mut builder =
            EventBuilder::create(uri(), &base_row().with(bindings::TIME_END, "later")).unwrap();
        builder.merge_row(&base_row().with(bindings::TIME_END, "2020-03-07T18:00:00Z"));

        let event = builder.finalize();
        assert_eq!(
            event.end(),
            Some(Utc.with_ymd_and_hms(2020, 3, 7, 18, 0, 0).unwrap())
        );
    }

    #[test]
    fn counts_merged_rows() {
        let mut builder = EventBuilder::create(uri(), &base_row()).unwrap();
        builder.merge_row(&base_row());
        assert_eq!(builder.rows_merged(), 2);
    }

    #[test]
    fn finalized_event_serializes_relations_as_lists() {
        let row = base_row()
            .with(bindings::AGENT, "urn:agent:1")
            .with(bindings::DEPICTION, "http://img/1.png");
        let event = EventBuilder::create(uri(), &row).unwrap().finalize();

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["uri"], "urn:event:a");
        assert_eq!(json["participants"][0]["uri"], "urn:agent:1");
        assert_eq!(json["photos"][0], "http://img/1.png");
    }
}
