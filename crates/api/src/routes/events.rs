//! Event listing, table and detail endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use common::Uri;
use domain::{Event, parse_instant};
use processor::{
    AscendingTable, ClassifiedEvents, DescendingTable, EventLookup, EventQueryRunner, EventTable,
    RowRenderer,
};
use serde::{Deserialize, Serialize};
use sparql::{EventQuery, SparqlEndpoint};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<E: SparqlEndpoint> {
    pub runner: EventQueryRunner<E>,
    pub renderer: RowRenderer,
    pub table_caption: String,
}

// -- Request types --

#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub min_date: Option<String>,
    pub max_date: Option<String>,
    /// Instant separating past from upcoming events; defaults to now.
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Default, Deserialize)]
pub struct TableParams {
    #[serde(default)]
    pub order: TableOrder,
    pub caption: Option<String>,
    pub min_date: Option<String>,
    pub max_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub iri: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct ListingResponse {
    pub reference: DateTime<Utc>,
    pub past: Vec<Event>,
    pub next: Option<Event>,
    pub future: Vec<Event>,
}

// -- Handlers --

/// GET /events: Events within the date bounds, split into past, next and future.
#[tracing::instrument(skip(state))]
pub async fn list<E: SparqlEndpoint + 'static>(
    State(state): State<Arc<AppState<E>>>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingResponse>, ApiError> {
    let query = bounded_query(params.min_date.as_deref(), params.max_date.as_deref())?;
    let reference = match params.reference.as_deref() {
        Some(value) => parse_param("reference", value)?,
        None => Utc::now(),
    };

    let events = state
        .runner
        .run_listing(&query, reference, ClassifiedEvents::new())
        .await?;

    Ok(Json(ListingResponse {
        reference,
        past: events.past,
        next: events.next,
        future: events.future,
    }))
}

/// GET /events/table: Events rendered as table rows, `null` when there are none.
#[tracing::instrument(skip(state))]
pub async fn table<E: SparqlEndpoint + 'static>(
    State(state): State<Arc<AppState<E>>>,
    Query(params): Query<TableParams>,
) -> Result<Json<Option<EventTable>>, ApiError> {
    let query = bounded_query(params.min_date.as_deref(), params.max_date.as_deref())?;
    let caption = params
        .caption
        .unwrap_or_else(|| state.table_caption.clone());
    let renderer = state.renderer.clone();
    let now = Utc::now();

    let table = match params.order {
        TableOrder::Asc => state
            .runner
            .run_listing(&query, now, AscendingTable::new(caption, renderer))
            .await?
            .into_table(),
        TableOrder::Desc => state
            .runner
            .run_listing(&query, now, DescendingTable::new(caption, renderer))
            .await?
            .into_table(),
    };

    Ok(Json(table))
}

/// GET /events/detail: One event with all its participants, posts and photos.
#[tracing::instrument(skip(state))]
pub async fn detail<E: SparqlEndpoint + 'static>(
    State(state): State<Arc<AppState<E>>>,
    Query(params): Query<DetailParams>,
) -> Result<Json<Event>, ApiError> {
    let lookup = state
        .runner
        .run_single(Uri::from(params.iri.as_str()), EventLookup::new())
        .await?;

    lookup
        .into_event()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Event {} not found", params.iri)))
}

fn bounded_query(min_date: Option<&str>, max_date: Option<&str>) -> Result<EventQuery, ApiError> {
    let mut query = EventQuery::new();
    if let Some(value) = min_date {
        query = query.min_date(parse_param("min_date", value)?);
    }
    if let Some(value) = max_date {
        query = query.max_date(parse_param("max_date", value)?);
    }
    Ok(query)
}

fn parse_param(name: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    parse_instant(value)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid {name}: {value:?}")))
}
