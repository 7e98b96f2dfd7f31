//! Single-pass reduction of grouped rows into events.

use chrono::{DateTime, Utc};
use common::{Row, Uri, bindings};
use domain::{Event, EventBuilder, EventError};

use crate::classify::Classifier;
use crate::sink::{EventSink, SingleEventHandler};
use crate::{Result, UsageError};

/// What a reducer does with the events it completes.
///
/// The reducer owns grouping and merging; the mode decides how rows map to
/// identities and where finished events go.
pub trait ReductionMode {
    /// Returns the identity key of the event `row` describes.
    fn identity(&self, row: &Row) -> std::result::Result<Uri, EventError>;

    /// Receives an event whose rows are all merged.
    fn complete(&mut self, event: Event);

    /// Called once after the last event has been completed.
    fn finish(&mut self);
}

/// Ascending listing: each event is classified and dispatched to a sink.
pub struct Listing<S> {
    sink: S,
    classifier: Classifier,
}

impl<S: EventSink> Listing<S> {
    pub fn new(sink: S, reference: DateTime<Utc>) -> Self {
        Self {
            sink,
            classifier: Classifier::new(reference),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: EventSink> ReductionMode for Listing<S> {
    fn identity(&self, row: &Row) -> std::result::Result<Uri, EventError> {
        row.get(bindings::ITEM)
            .map(Uri::from)
            .ok_or(EventError::MissingRequiredField {
                field: bindings::ITEM,
                event: None,
            })
    }

    fn complete(&mut self, event: Event) {
        let bucket = self.classifier.classify(&event);
        tracing::debug!(event = %event.uri(), %bucket, "dispatching event");
        metrics::counter!("processor_events_dispatched", "bucket" => bucket.as_str()).increment(1);
        self.sink.dispatch(bucket, event);
    }

    fn finish(&mut self) {
        self.sink.flush();
    }
}

/// Lookup of one known event: every row merges into it, no classification.
pub struct SingleEvent<H> {
    uri: Uri,
    handler: H,
    found: bool,
}

impl<H: SingleEventHandler> SingleEvent<H> {
    pub fn new(uri: Uri, handler: H) -> Self {
        Self {
            uri,
            handler,
            found: false,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }
}

impl<H: SingleEventHandler> ReductionMode for SingleEvent<H> {
    fn identity(&self, _row: &Row) -> std::result::Result<Uri, EventError> {
        Ok(self.uri.clone())
    }

    fn complete(&mut self, event: Event) {
        self.found = true;
        self.handler.found(event);
    }

    fn finish(&mut self) {
        if !self.found {
            self.handler.not_found();
        }
    }
}

enum State {
    Empty,
    Accumulating(EventBuilder),
    Finished,
    /// A fatal error ended the run; nothing more is dispatched.
    Aborted,
}

/// Groups a stream of rows by event and merges each group into an [`Event`].
///
/// Rows describing the same event must be contiguous. The reducer holds at
/// most one open event: when a row with a different identity arrives, the
/// open event is finalized and handed to the mode before the new one opens.
///
/// State transitions:
/// ```text
/// Empty ──submit──► Accumulating ──submit (same key)──► Accumulating
///   │                    │  └──submit (new key): complete, reopen──┘
///   └──────finish────────┴──finish──► Finished
///
/// any fatal error ──► Aborted
/// ```
pub struct RowStreamReducer<M> {
    mode: M,
    state: State,
    completed: usize,
}

impl<S: EventSink> RowStreamReducer<Listing<S>> {
    /// Creates a reducer classifying events around `reference`.
    pub fn listing(sink: S, reference: DateTime<Utc>) -> Self {
        Self::new(Listing::new(sink, reference))
    }

    pub fn sink(&self) -> &S {
        self.mode.sink()
    }

    pub fn into_sink(self) -> S {
        self.mode.into_sink()
    }
}

impl<H: SingleEventHandler> RowStreamReducer<SingleEvent<H>> {
    /// Creates a reducer merging every row into the event `uri`.
    pub fn single(uri: Uri, handler: H) -> Self {
        Self::new(SingleEvent::new(uri, handler))
    }

    pub fn handler(&self) -> &H {
        self.mode.handler()
    }

    pub fn into_handler(self) -> H {
        self.mode.into_handler()
    }
}

impl<M: ReductionMode> RowStreamReducer<M> {
    pub fn new(mode: M) -> Self {
        Self {
            mode,
            state: State::Empty,
            completed: 0,
        }
    }

    /// Returns the number of events handed to the mode so far.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Returns true once [`finish`](Self::finish) has succeeded.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished)
    }

    /// Returns true if a fatal error ended the run.
    pub fn is_aborted(&self) -> bool {
        matches!(self.state, State::Aborted)
    }

    pub fn mode(&self) -> &M {
        &self.mode
    }

    pub fn into_mode(self) -> M {
        self.mode
    }

    /// Feeds the next row of the stream.
    ///
    /// A row that cannot open an event aborts the run: the error is returned
    /// and every later call fails with [`UsageError::Aborted`].
    pub fn submit(&mut self, row: &Row) -> Result<()> {
        // Any early return below leaves the reducer aborted.
        match std::mem::replace(&mut self.state, State::Aborted) {
            State::Finished => {
                self.state = State::Finished;
                Err(UsageError::SubmitAfterFinish.into())
            }
            State::Aborted => Err(UsageError::Aborted.into()),
            State::Empty => {
                let builder = self.open(row)?;
                self.state = State::Accumulating(builder);
                Ok(())
            }
            State::Accumulating(mut builder) => {
                let uri = self.mode.identity(row)?;
                if &uri == builder.uri() {
                    builder.merge_row(row);
                    self.state = State::Accumulating(builder);
                } else {
                    self.complete(builder);
                    self.state = State::Accumulating(EventBuilder::create(uri, row)?);
                }
                Ok(())
            }
        }
    }

    /// Ends the stream: completes the open event, if any, then finishes the
    /// mode. Must be called exactly once.
    pub fn finish(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, State::Aborted) {
            State::Finished => {
                self.state = State::Finished;
                return Err(UsageError::FinishedTwice.into());
            }
            State::Aborted => return Err(UsageError::Aborted.into()),
            State::Empty => {}
            State::Accumulating(builder) => self.complete(builder),
        }

        self.mode.finish();
        self.state = State::Finished;
        Ok(())
    }

    /// Submits every row, then finishes, returning the mode.
    pub fn reduce<'r, I>(mut self, rows: I) -> Result<M>
    where
        I: IntoIterator<Item = &'r Row>,
    {
        for row in rows {
            self.submit(row)?;
        }
        self.finish()?;
        Ok(self.mode)
    }

    fn open(&self, row: &Row) -> Result<EventBuilder> {
        let uri = self.mode.identity(row)?;
        Ok(EventBuilder::create(uri, row)?)
    }

    fn complete(&mut self, builder: EventBuilder) {
        self.completed += 1;
        self.mode.complete(builder.finalize());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bucket, ClassifiedEvents, EventLookup, ProcessorError};
    use chrono::TimeZone;

    /// A sink recording the call sequence.
    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<(String, String)>,
    }

    impl EventSink for RecordingSink {
        fn process_past(&mut self, event: Event) {
            self.calls.push(("past".into(), event.uri().to_string()));
        }

        fn process_next(&mut self, event: Event) {
            self.calls.push(("next".into(), event.uri().to_string()));
        }

        fn process_future(&mut self, event: Event) {
            self.calls.push(("future".into(), event.uri().to_string()));
        }

        fn flush(&mut self) {
            self.calls.push(("flush".into(), String::new()));
        }
    }

    fn row(uri: &str, start: &str) -> Row {
        Row::new()
            .with(bindings::ITEM, uri)
            .with(bindings::ITEM_LABEL, format!("Event {uri}"))
            .with(bindings::TIME_START, start)
            .with(bindings::ADDRESS, "Piazza Duomo")
    }

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap()
    }

    fn calls(sink: &RecordingSink) -> Vec<(&str, &str)> {
        sink.calls
            .iter()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect()
    }

    #[test]
    fn classifies_past_next_future_then_flushes() {
        let rows = [
            row("urn:a", "2020-01-01T00:00:00Z"),
            row("urn:b", "2020-06-01T00:00:00Z"),
            row("urn:c", "2021-01-01T00:00:00Z"),
        ];

        let mut reducer = RowStreamReducer::listing(RecordingSink::default(), reference());
        for r in &rows {
            reducer.submit(r).unwrap();
        }
        reducer.finish().unwrap();

        assert_eq!(
            calls(reducer.sink()),
            vec![
                ("past", "urn:a"),
                ("next", "urn:b"),
                ("future", "urn:c"),
                ("flush", ""),
            ]
        );
        assert_eq!(reducer.completed(), 3);
    }

    #[test]
    fn open_event_is_only_dispatched_at_boundary() {
        let mut reducer = RowStreamReducer::listing(RecordingSink::default(), reference());

        reducer.submit(&row("urn:a", "2020-01-01T00:00:00Z")).unwrap();
        reducer.submit(&row("urn:a", "2020-01-01T00:00:00Z")).unwrap();
        assert!(reducer.sink().calls.is_empty());

        reducer.submit(&row("urn:b", "2020-02-01T00:00:00Z")).unwrap();
        assert_eq!(calls(reducer.sink()), vec![("past", "urn:a")]);
    }

    #[test]
    fn one_event_per_identity_regardless_of_row_count() {
        let mut rows = Vec::new();
        for (uri, copies) in [("urn:a", 3), ("urn:b", 1), ("urn:c", 5)] {
            for _ in 0..copies {
                rows.push(row(uri, "2020-03-01T00:00:00Z"));
            }
        }

        let sink = RowStreamReducer::listing(ClassifiedEvents::new(), reference())
            .reduce(&rows)
            .unwrap()
            .into_sink();

        assert_eq!(sink.len(), 3);
        assert!(sink.flushed);
    }

    #[test]
    fn merges_participants_without_duplicates() {
        let rows = [
            row("urn:a", "2020-01-01T00:00:00Z").with(bindings::AGENT, "urn:p1"),
            row("urn:a", "2020-01-01T00:00:00Z").with(bindings::AGENT, "urn:p1"),
            row("urn:a", "2020-01-01T00:00:00Z").with(bindings::AGENT, "urn:p2"),
        ];

        let sink = RowStreamReducer::listing(ClassifiedEvents::new(), reference())
            .reduce(&rows)
            .unwrap()
            .into_sink();

        let participants: Vec<_> = sink.past[0]
            .participants()
            .iter()
            .map(|p| p.uri.as_str())
            .collect();
        assert_eq!(participants, vec!["urn:p1", "urn:p2"]);
    }

    #[test]
    fn empty_stream_only_flushes() {
        let mut reducer = RowStreamReducer::listing(RecordingSink::default(), reference());
        reducer.finish().unwrap();
        assert_eq!(calls(reducer.sink()), vec![("flush", "")]);
        assert!(reducer.is_finished());
    }

    #[test]
    fn all_past_leaves_next_slot_unused() {
        let rows = [
            row("urn:a", "2019-01-01T00:00:00Z"),
            row("urn:b", "2019-02-01T00:00:00Z"),
        ];
        let sink = RowStreamReducer::listing(ClassifiedEvents::new(), reference())
            .reduce(&rows)
            .unwrap()
            .into_sink();

        assert_eq!(sink.past.len(), 2);
        assert!(sink.next.is_none());
        assert!(sink.future.is_empty());
    }

    #[test]
    fn missing_field_on_opening_row_aborts_after_earlier_dispatches() {
        let mut reducer = RowStreamReducer::listing(RecordingSink::default(), reference());
        reducer.submit(&row("urn:a", "2020-01-01T00:00:00Z")).unwrap();

        let broken = Row::new()
            .with(bindings::ITEM, "urn:b")
            .with(bindings::ITEM_LABEL, "No start")
            .with(bindings::ADDRESS, "Piazza Duomo");
        let err = reducer.submit(&broken).unwrap_err();

        assert!(matches!(
            err,
            ProcessorError::Event(EventError::MissingRequiredField {
                field: bindings::TIME_START,
                ..
            })
        ));
        assert!(reducer.is_aborted());
        assert_eq!(calls(reducer.sink()), vec![("past", "urn:a")]);

        assert!(matches!(
            reducer.finish(),
            Err(ProcessorError::Usage(UsageError::Aborted))
        ));
        assert!(matches!(
            reducer.submit(&row("urn:c", "2020-01-01T00:00:00Z")),
            Err(ProcessorError::Usage(UsageError::Aborted))
        ));
        assert_eq!(calls(reducer.sink()), vec![("past", "urn:a")]);
    }

    #[test]
    fn missing_identity_is_a_missing_field() {
        let mut reducer = RowStreamReducer::listing(ClassifiedEvents::new(), reference());
        let no_item = Row::new()
            .with(bindings::ITEM_LABEL, "Anonymous")
            .with(bindings::TIME_START, "2020-01-01T00:00:00Z")
            .with(bindings::ADDRESS, "Piazza Duomo");

        assert!(matches!(
            reducer.submit(&no_item),
            Err(ProcessorError::Event(EventError::MissingRequiredField {
                field: bindings::ITEM,
                event: None,
            }))
        ));
    }

    #[test]
    fn submit_after_finish_is_a_usage_error() {
        let mut reducer = RowStreamReducer::listing(ClassifiedEvents::new(), reference());
        reducer.finish().unwrap();

        assert!(matches!(
            reducer.submit(&row("urn:a", "2020-01-01T00:00:00Z")),
            Err(ProcessorError::Usage(UsageError::SubmitAfterFinish))
        ));
        assert!(reducer.is_finished());
    }

    #[test]
    fn finishing_twice_is_a_usage_error() {
        let mut reducer = RowStreamReducer::listing(RecordingSink::default(), reference());
        reducer.submit(&row("urn:a", "2021-01-01T00:00:00Z")).unwrap();
        reducer.finish().unwrap();

        assert!(matches!(
            reducer.finish(),
            Err(ProcessorError::Usage(UsageError::FinishedTwice))
        ));
        assert_eq!(
            calls(reducer.sink()),
            vec![("next", "urn:a"), ("flush", "")]
        );
    }

    #[test]
    fn single_event_merges_every_row() {
        let uri = Uri::from("urn:solo");
        let rows = [
            row("urn:ignored", "2020-01-01T00:00:00Z").with(bindings::AGENT, "urn:p1"),
            row("urn:ignored", "2020-01-01T00:00:00Z")
                .with(bindings::AGENT, "urn:p1")
                .with(bindings::POST, "urn:post1"),
        ];

        let lookup = RowStreamReducer::single(uri.clone(), EventLookup::new())
            .reduce(&rows)
            .unwrap()
            .into_handler();

        let event = lookup.into_event().unwrap();
        assert_eq!(event.uri(), &uri);
        assert_eq!(event.participants().len(), 1);
        assert_eq!(event.posts().len(), 1);
    }

    #[test]
    fn single_event_reports_not_found_once() {
        let mut found = 0;
        let mut missing = 0;
        let handler = crate::Callbacks::new(|_| found += 1, || missing += 1);

        let mut reducer = RowStreamReducer::single(Uri::from("urn:none"), handler);
        reducer.finish().unwrap();
        assert!(reducer.finish().is_err());
        drop(reducer);

        assert_eq!((found, missing), (0, 1));
    }

    #[test]
    fn single_event_with_rows_is_found_once() {
        let mut found = Vec::new();
        let mut missing = 0;
        let handler = crate::Callbacks::new(|e: Event| found.push(e), || missing += 1);

        let rows = [
            row("urn:x", "2020-01-01T00:00:00Z"),
            row("urn:x", "2020-01-01T00:00:00Z"),
        ];
        RowStreamReducer::single(Uri::from("urn:x"), handler)
            .reduce(&rows)
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(missing, 0);
    }

    #[test]
    fn dispatch_counts_match_buckets() {
        let rows = [
            row("urn:a", "2020-01-01T00:00:00Z"),
            row("urn:b", "2020-05-01T00:00:00Z"),
            row("urn:c", "2020-06-01T00:00:01Z"),
            row("urn:d", "2020-07-01T00:00:00Z"),
            row("urn:e", "2020-08-01T00:00:00Z"),
        ];
        let mut reducer = RowStreamReducer::listing(ClassifiedEvents::new(), reference());
        for r in &rows {
            reducer.submit(r).unwrap();
        }
        reducer.finish().unwrap();

        let sink = reducer.sink();
        assert_eq!(sink.past.len(), 2);
        assert_eq!(sink.next.as_ref().map(|e| e.uri().as_str()), Some("urn:c"));
        assert_eq!(sink.future.len(), 2);
        assert_eq!(
            [Bucket::Past, Bucket::Next, Bucket::Future].map(|b| b.as_str()),
            ["past", "next", "future"]
        );
    }
}
