//! Domain layer for event listings.
//!
//! This crate provides the aggregate side of the row reducer:
//! - [`Event`], the immutable aggregate of every row describing one event
//! - [`Participant`], [`Post`] and [`Photo`] sub-entities
//! - [`EventBuilder`], which opens an aggregate from a row and merges later
//!   rows into it without duplicating sub-entities

pub mod error;
pub mod event;

pub use error::{EventError, Result};
pub use event::{Event, EventBuilder, Participant, Photo, Post, parse_instant};
