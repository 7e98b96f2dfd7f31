//! The event aggregate and its builder.

pub mod aggregate;
pub mod builder;
pub mod entities;
pub mod time;

pub use aggregate::Event;
pub use builder::EventBuilder;
pub use entities::{Participant, Photo, Post};
pub use time::parse_instant;
