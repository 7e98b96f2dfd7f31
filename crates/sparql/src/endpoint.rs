use async_trait::async_trait;
use common::Row;

use crate::Result;

/// Transport to a SPARQL endpoint.
///
/// `select` returns the complete, already-parsed result set. A failed
/// request yields an error and no rows, so a reducer never sees part of a
/// failed fetch.
#[async_trait]
pub trait SparqlEndpoint: Send + Sync {
    /// Runs a `SELECT` query and returns its solutions in endpoint order.
    async fn select(&self, query: &str) -> Result<Vec<Row>>;
}
