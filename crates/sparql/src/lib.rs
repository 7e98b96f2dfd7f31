//! SPARQL side of the event listing: what to ask and how to ask it.
//!
//! - [`EventQuery`] / [`SingleEventQuery`] build the query text and declare
//!   the row shape and ordering the reducer relies on
//! - [`results`] parses `application/sparql-results+json` into [`Row`]s
//! - [`SparqlEndpoint`] is the transport seam, with [`HttpEndpoint`] for
//!   real endpoints and [`InMemoryEndpoint`] for tests

pub mod endpoint;
pub mod error;
pub mod http;
pub mod memory;
pub mod query;
pub mod results;

pub use common::{Row, Uri};
pub use endpoint::SparqlEndpoint;
pub use error::{QueryError, Result, SparqlError};
pub use http::HttpEndpoint;
pub use memory::InMemoryEndpoint;
pub use query::{EventQuery, SingleEventQuery, SortOrder};
pub use results::{SparqlResults, parse_rows};
