//! Event processing: from query rows to classified events.
//!
//! This crate provides the reducing side of an event listing:
//! - [`RowStreamReducer`], a single forward pass that groups rows by event,
//!   merges them and hands each finished event to a [`ReductionMode`]
//! - [`Listing`] mode, which classifies events into past / next / future for
//!   an [`EventSink`]
//! - [`SingleEvent`] mode, which merges every row into one event for a
//!   [`SingleEventHandler`]
//! - table sinks rendering events into presentational rows
//! - [`EventQueryRunner`], which fetches rows from an endpoint and reduces them

pub mod classify;
pub mod error;
pub mod reducer;
pub mod runner;
pub mod sink;
pub mod table;

pub use classify::{Bucket, Classifier};
pub use error::{ProcessorError, Result, UsageError};
pub use reducer::{Listing, ReductionMode, RowStreamReducer, SingleEvent};
pub use runner::EventQueryRunner;
pub use sink::{Callbacks, ClassifiedEvents, EventLookup, EventSink, SingleEventHandler};
pub use table::{AscendingTable, DescendingTable, EventTable, EventTableRow, RowRenderer};
