use std::time::{Duration, Instant};

use async_trait::async_trait;
use common::Row;

use crate::{Result, SparqlError, endpoint::SparqlEndpoint, results::parse_rows};

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Endpoint reached over the SPARQL 1.1 protocol.
///
/// Queries are sent as `POST` with a form-encoded `query` parameter and the
/// result set is requested as SPARQL JSON.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    /// Creates an endpoint for `url` with reqwest's default client.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Creates an endpoint whose requests fail after `timeout`.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send(&self, query: &str) -> Result<Vec<Row>> {
        let resp = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, SPARQL_RESULTS_JSON)
            .form(&[("query", query)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SparqlError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.bytes().await?;
        parse_rows(&body)
    }
}

#[async_trait]
impl SparqlEndpoint for HttpEndpoint {
    #[tracing::instrument(skip(self, query), fields(url = %self.url))]
    async fn select(&self, query: &str) -> Result<Vec<Row>> {
        let started = Instant::now();
        metrics::counter!("sparql_queries_total").increment(1);

        let result = self.send(query).await;
        metrics::histogram!("sparql_query_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(rows) => tracing::debug!(rows = rows.len(), "query answered"),
            Err(err) => {
                metrics::counter!("sparql_query_failures_total").increment(1);
                tracing::warn!(error = %err, "query failed");
            }
        }
        result
    }
}
