//! Table sinks rendering events into presentational rows.

use std::collections::VecDeque;

use chrono::{FixedOffset, Offset, Utc};
use domain::Event;
use serde::Serialize;

use crate::sink::EventSink;

/// Page linked from each row; the event URI is passed as `iri`.
pub const DEFAULT_DETAILS_BASE: &str = "eventDetails.php";

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventTableRow {
    /// Start date as `DD/MM/YYYY`.
    pub date: String,
    /// Start time as `HH:MM`.
    pub time: String,
    /// Place name, empty when unknown.
    pub place: String,
    pub title: String,
    pub details_href: String,
}

/// A captioned table of events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventTable {
    pub caption: String,
    pub rows: Vec<EventTableRow>,
}

/// Formats events into table rows.
#[derive(Debug, Clone)]
pub struct RowRenderer {
    details_base: String,
    offset: FixedOffset,
}

impl Default for RowRenderer {
    fn default() -> Self {
        Self {
            details_base: DEFAULT_DETAILS_BASE.to_string(),
            offset: Utc.fix(),
        }
    }
}

impl RowRenderer {
    /// Creates a renderer linking to `details_base`, showing times in UTC.
    pub fn new(details_base: impl Into<String>) -> Self {
        Self {
            details_base: details_base.into(),
            ..Self::default()
        }
    }

    /// Shows dates and times at `offset` instead of UTC.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn render(&self, event: &Event) -> EventTableRow {
        let start = event.start().with_timezone(&self.offset);
        EventTableRow {
            date: start.format("%d/%m/%Y").to_string(),
            time: start.format("%H:%M").to_string(),
            place: event.place().unwrap_or_default().to_string(),
            title: event.name().to_string(),
            details_href: format!(
                "{}?iri={}",
                self.details_base,
                urlencoding::encode(event.uri().as_str())
            ),
        }
    }
}

/// Sink appending one row per event, in stream order.
///
/// The table only exists once an event arrives; a run without events
/// produces no table.
#[derive(Debug, Clone)]
pub struct AscendingTable {
    caption: String,
    renderer: RowRenderer,
    table: Option<EventTable>,
}

impl AscendingTable {
    pub fn new(caption: impl Into<String>, renderer: RowRenderer) -> Self {
        Self {
            caption: caption.into(),
            renderer,
            table: None,
        }
    }

    pub fn table(&self) -> Option<&EventTable> {
        self.table.as_ref()
    }

    pub fn into_table(self) -> Option<EventTable> {
        self.table
    }

    fn add_row(&mut self, event: &Event) {
        let row = self.renderer.render(event);
        self.table
            .get_or_insert_with(|| EventTable {
                caption: self.caption.clone(),
                rows: Vec::new(),
            })
            .rows
            .push(row);
    }
}

impl EventSink for AscendingTable {
    fn process_past(&mut self, event: Event) {
        self.add_row(&event);
    }

    fn process_next(&mut self, event: Event) {
        self.add_row(&event);
    }

    fn process_future(&mut self, event: Event) {
        self.add_row(&event);
    }

    fn flush(&mut self) {}
}

/// Sink inserting each row before the previously added one, so the table
/// lists events in reverse stream order.
#[derive(Debug, Clone)]
pub struct DescendingTable {
    caption: String,
    renderer: RowRenderer,
    rows: Option<VecDeque<EventTableRow>>,
}

impl DescendingTable {
    pub fn new(caption: impl Into<String>, renderer: RowRenderer) -> Self {
        Self {
            caption: caption.into(),
            renderer,
            rows: None,
        }
    }

    pub fn into_table(self) -> Option<EventTable> {
        let caption = self.caption;
        self.rows.map(|rows| EventTable {
            caption,
            rows: rows.into(),
        })
    }

    fn add_row(&mut self, event: &Event) {
        let row = self.renderer.render(event);
        self.rows.get_or_insert_with(VecDeque::new).push_front(row);
    }
}

impl EventSink for DescendingTable {
    fn process_past(&mut self, event: Event) {
        self.add_row(&event);
    }

    fn process_next(&mut self, event: Event) {
        self.add_row(&event);
    }

    fn process_future(&mut self, event: Event) {
        self.add_row(&event);
    }

    fn flush(&mut self) {}
}
