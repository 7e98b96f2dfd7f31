use std::sync::Arc;

use async_trait::async_trait;
use common::Row;
use tokio::sync::RwLock;

use crate::{Result, SparqlError, endpoint::SparqlEndpoint};

/// In-memory endpoint for testing.
///
/// Answers every query with the same canned rows and records the query
/// text it received. It can be primed to fail with an HTTP-like status.
#[derive(Clone, Default)]
pub struct InMemoryEndpoint {
    rows: Arc<RwLock<Vec<Row>>>,
    queries: Arc<RwLock<Vec<String>>>,
    failure: Arc<RwLock<Option<(u16, String)>>>,
}

impl InMemoryEndpoint {
    /// Creates an endpoint with no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an endpoint answering with `rows`.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
            ..Self::default()
        }
    }

    /// Replaces the canned rows.
    pub async fn set_rows(&self, rows: Vec<Row>) {
        *self.rows.write().await = rows;
    }

    /// Makes every following query fail with `status`.
    pub async fn fail_with_status(&self, status: u16, body: impl Into<String>) {
        *self.failure.write().await = Some((status, body.into()));
    }

    /// Returns the query texts received so far.
    pub async fn queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Returns the number of queries received.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }
}

#[async_trait]
impl SparqlEndpoint for InMemoryEndpoint {
    async fn select(&self, query: &str) -> Result<Vec<Row>> {
        self.queries.write().await.push(query.to_string());

        if let Some((status, body)) = self.failure.read().await.clone() {
            return Err(SparqlError::Status { status, body });
        }
        Ok(self.rows.read().await.clone())
    }
}
