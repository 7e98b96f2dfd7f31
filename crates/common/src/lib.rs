//! Shared value types used across the workspace.
//!
//! - [`Uri`] identifies events and their sub-entities
//! - [`Row`] is one solution of a SPARQL `SELECT`, keyed by variable name
//! - [`bindings`] names the variables the event queries project

pub mod bindings;
pub mod row;
pub mod types;

pub use row::Row;
pub use types::Uri;
