//! Consumers of reduced events.

use domain::Event;

use crate::Bucket;

/// Receives the events of an ascending listing, already classified.
///
/// For every event exactly one of `process_past`, `process_next` or
/// `process_future` is called, in stream order. `flush` is called once,
/// after the last event of the run.
pub trait EventSink {
    fn process_past(&mut self, event: Event);

    /// Called for at most one event per run.
    fn process_next(&mut self, event: Event);

    fn process_future(&mut self, event: Event);

    /// Signals that the run is complete.
    fn flush(&mut self);

    /// Routes `event` to the method matching `bucket`.
    fn dispatch(&mut self, bucket: Bucket, event: Event) {
        match bucket {
            Bucket::Past => self.process_past(event),
            Bucket::Next => self.process_next(event),
            Bucket::Future => self.process_future(event),
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn process_past(&mut self, event: Event) {
        (**self).process_past(event);
    }

    fn process_next(&mut self, event: Event) {
        (**self).process_next(event);
    }

    fn process_future(&mut self, event: Event) {
        (**self).process_future(event);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

/// Receives the outcome of a single-event lookup.
///
/// Exactly one of the two methods is called, once, when the run finishes.
pub trait SingleEventHandler {
    fn found(&mut self, event: Event);
    fn not_found(&mut self);
}

impl<H: SingleEventHandler + ?Sized> SingleEventHandler for &mut H {
    fn found(&mut self, event: Event) {
        (**self).found(event);
    }

    fn not_found(&mut self) {
        (**self).not_found();
    }
}

/// Sink collecting events by bucket.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedEvents {
    pub past: Vec<Event>,
    pub next: Option<Event>,
    pub future: Vec<Event>,
    pub flushed: bool,
}

impl ClassifiedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of events collected.
    pub fn len(&self) -> usize {
        self.past.len() + usize::from(self.next.is_some()) + self.future.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for ClassifiedEvents {
    fn process_past(&mut self, event: Event) {
        self.past.push(event);
    }

    fn process_next(&mut self, event: Event) {
        self.next = Some(event);
    }

    fn process_future(&mut self, event: Event) {
        self.future.push(event);
    }

    fn flush(&mut self) {
        self.flushed = true;
    }
}

/// Handler recording the outcome of a single-event lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EventLookup {
    /// The run has not finished yet.
    #[default]
    Pending,
    Found(Event),
    NotFound,
}

impl EventLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the event if it was found.
    pub fn into_event(self) -> Option<Event> {
        match self {
            EventLookup::Found(event) => Some(event),
            EventLookup::Pending | EventLookup::NotFound => None,
        }
    }
}

impl SingleEventHandler for EventLookup {
    fn found(&mut self, event: Event) {
        *self = EventLookup::Found(event);
    }

    fn not_found(&mut self) {
        *self = EventLookup::NotFound;
    }
}

/// Handler built from a pair of closures.
pub struct Callbacks<F, G> {
    on_found: F,
    on_not_found: G,
}

impl<F, G> Callbacks<F, G>
where
    F: FnMut(Event),
    G: FnMut(),
{
    pub fn new(on_found: F, on_not_found: G) -> Self {
        Self {
            on_found,
            on_not_found,
        }
    }
}

impl<F, G> SingleEventHandler for Callbacks<F, G>
where
    F: FnMut(Event),
    G: FnMut(),
{
    fn found(&mut self, event: Event) {
        (self.on_found)(event);
    }

    fn not_found(&mut self) {
        (self.on_not_found)();
    }
}
