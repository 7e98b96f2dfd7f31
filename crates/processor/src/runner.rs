//! Query runner feeding endpoint rows to a reducer.

use chrono::{DateTime, Utc};
use common::Uri;
use sparql::{EventQuery, SingleEventQuery, SparqlEndpoint, SparqlError};

use crate::Result;
use crate::reducer::RowStreamReducer;
use crate::sink::{EventSink, SingleEventHandler};

/// Runs event queries against an endpoint and reduces the answers.
///
/// Each run fetches the complete result set first; only a successful fetch
/// creates a reducer, so sinks never see rows from a failed request.
pub struct EventQueryRunner<E: SparqlEndpoint> {
    endpoint: E,
}

impl<E: SparqlEndpoint> EventQueryRunner<E> {
    pub fn new(endpoint: E) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Runs a listing query, classifying events around `reference`.
    ///
    /// Returns the sink after its `flush` has been called.
    #[tracing::instrument(skip(self, query, sink), fields(%reference))]
    pub async fn run_listing<S: EventSink>(
        &self,
        query: &EventQuery,
        reference: DateTime<Utc>,
        sink: S,
    ) -> Result<S> {
        let text = query.build().map_err(SparqlError::from)?;
        let rows = self.endpoint.select(&text).await?;

        let mut reducer = RowStreamReducer::listing(sink, reference);
        for row in &rows {
            reducer.submit(row)?;
        }
        reducer.finish()?;

        metrics::counter!("processor_runs_total", "mode" => "listing").increment(1);
        tracing::info!(
            rows = rows.len(),
            events = reducer.completed(),
            "listing complete"
        );

        Ok(reducer.into_sink())
    }

    /// Looks up one event by URI.
    ///
    /// Returns the handler after `found` or `not_found` has been called.
    #[tracing::instrument(skip(self, handler), fields(%uri))]
    pub async fn run_single<H: SingleEventHandler>(&self, uri: Uri, handler: H) -> Result<H> {
        let query = SingleEventQuery::new(uri.clone()).map_err(SparqlError::from)?;
        let rows = self.endpoint.select(&query.build()).await?;

        let handler = RowStreamReducer::single(uri, handler)
            .reduce(&rows)?
            .into_handler();

        metrics::counter!("processor_runs_total", "mode" => "single").increment(1);
        tracing::info!(rows = rows.len(), "lookup complete");

        Ok(handler)
    }
}
