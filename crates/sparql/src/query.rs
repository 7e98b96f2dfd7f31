//! Event query templates.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use common::{Uri, bindings};

use crate::QueryError;

/// Prefix declarations shared by both event queries.
const PREFIXES: &str = "\
PREFIX locn:<http://www.w3.org/ns/locn#>
PREFIX wsg84:<http://www.w3.org/2003/01/geo/wgs84_pos#>
PREFIX foaf:<http://xmlns.com/foaf/0.1/>
PREFIX rdfs:<http://www.w3.org/2000/01/rdf-schema#>
PREFIX event:<http://purl.org/NET/c4dm/event.owl#>
PREFIX time:<http://www.w3.org/2006/time#>
PREFIX sioc:<http://rdfs.org/sioc/ns#>
PREFIX dc:<http://purl.org/dc/elements/1.1/>
PREFIX xsd:<http://www.w3.org/2001/XMLSchema#>
";

/// Variables projected by the single-event query, in `SELECT` order.
const EVENT_VARIABLES: &[&str] = &[
    bindings::AGENT,
    bindings::POST,
    bindings::EVENT_PLACE,
    bindings::DEPICTION,
    bindings::ITEM_LABEL,
    bindings::SITE,
    bindings::LOGO,
    bindings::TIME_START,
    bindings::TIME_END,
    bindings::ADDRESS,
    bindings::DESCRIPTION,
    bindings::HOMEPAGE,
    bindings::PARTICIPANT_NAME,
    bindings::POST_TITLE,
    bindings::POST_LABEL,
    bindings::POST_CREATOR,
];

/// Variables projected by the listing query: the event URI, then the rest.
const LISTING_VARIABLES: &[&str] = &[
    bindings::ITEM,
    bindings::AGENT,
    bindings::POST,
    bindings::EVENT_PLACE,
    bindings::DEPICTION,
    bindings::ITEM_LABEL,
    bindings::SITE,
    bindings::LOGO,
    bindings::TIME_START,
    bindings::TIME_END,
    bindings::ADDRESS,
    bindings::DESCRIPTION,
    bindings::HOMEPAGE,
    bindings::PARTICIPANT_NAME,
    bindings::POST_TITLE,
    bindings::POST_LABEL,
    bindings::POST_CREATOR,
];

/// Order of the rows a query produces, by start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lower bound used when only an upper bound is given.
pub fn default_min_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Upper bound used when only a lower bound is given.
pub fn default_max_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(3000, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Builder for the event listing query.
///
/// Rows come back sorted by ascending start time and then by event URI, so
/// all rows for one event are contiguous and events arrive in the order the
/// past/next/future classification expects.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    /// Extra triple patterns for the where-clause. The event is `?item`.
    pub additional_constraints: Option<String>,

    /// Prefix declarations used by `additional_constraints`.
    pub additional_prefixes: Option<String>,

    /// Only events starting at or after this instant (inclusive).
    pub min_date: Option<DateTime<Utc>>,

    /// Only events starting before this instant (exclusive).
    pub max_date: Option<DateTime<Utc>>,
}

impl EventQuery {
    /// Creates a query for every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds triple patterns to the where-clause.
    pub fn constraints(mut self, constraints: impl Into<String>) -> Self {
        self.additional_constraints = Some(constraints.into());
        self
    }

    /// Adds prefix declarations.
    pub fn prefixes(mut self, prefixes: impl Into<String>) -> Self {
        self.additional_prefixes = Some(prefixes.into());
        self
    }

    /// Filters by minimum start time (inclusive).
    pub fn min_date(mut self, date: DateTime<Utc>) -> Self {
        self.min_date = Some(date);
        self
    }

    /// Filters by maximum start time (exclusive).
    pub fn max_date(mut self, date: DateTime<Utc>) -> Self {
        self.max_date = Some(date);
        self
    }

    /// Row ordering produced by this query.
    pub fn sort_order(&self) -> SortOrder {
        SortOrder::Ascending
    }

    /// Variables each row may bind.
    pub fn variables(&self) -> &'static [&'static str] {
        LISTING_VARIABLES
    }

    /// Renders the query text.
    pub fn build(&self) -> Result<String, QueryError> {
        let mut query = String::from(PREFIXES);
        if let Some(prefixes) = non_blank(&self.additional_prefixes) {
            query.push_str(prefixes);
            query.push('\n');
        }

        push_select(&mut query, LISTING_VARIABLES);

        if let Some(constraints) = non_blank(&self.additional_constraints) {
            if constraints.ends_with('.') {
                return Err(QueryError::TrailingTerminator(constraints.to_string()));
            }
            query.push_str(&format!("\t{constraints} .\n"));
        }

        push_event_patterns(&mut query, "?item");

        if self.min_date.is_some() || self.max_date.is_some() {
            let min = format_instant(self.min_date.unwrap_or_else(default_min_date));
            let max = format_instant(self.max_date.unwrap_or_else(default_max_date));
            query.push_str(&format!(
                "\tFILTER (xsd:dateTime(?timeStart) >= '{min}'^^xsd:dateTime && xsd:dateTime(?timeStart) < '{max}'^^xsd:dateTime) .\n"
            ));
        }

        query.push_str("} ORDER BY ASC(?timeStart) ?item");
        Ok(query)
    }
}

/// Query retrieving every row describing one known event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleEventQuery {
    uri: Uri,
}

impl SingleEventQuery {
    /// Creates the query for `uri`, which must be writable as `<uri>`.
    pub fn new(uri: Uri) -> Result<Self, QueryError> {
        validate_iri(uri.as_str())?;
        Ok(Self { uri })
    }

    /// The event this query retrieves.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn sort_order(&self) -> SortOrder {
        SortOrder::Descending
    }

    pub fn variables(&self) -> &'static [&'static str] {
        EVENT_VARIABLES
    }

    /// Renders the query text.
    pub fn build(&self) -> String {
        let mut query = String::from(PREFIXES);
        push_select(&mut query, EVENT_VARIABLES);
        push_event_patterns(&mut query, &format!("<{}>", self.uri));
        query.push_str("} ORDER BY DESC(?timeStart)");
        query
    }
}

fn push_select(query: &mut String, variables: &[&str]) {
    query.push_str("SELECT DISTINCT");
    for var in variables {
        query.push_str(" ?");
        query.push_str(var);
    }
    query.push_str(" WHERE {\n");
}

/// Graph patterns binding every variable for the event term `subject`.
fn push_event_patterns(query: &mut String, subject: &str) {
    let s = subject;
    query.push_str(&format!(
        "\t{s} locn:location ?site .
\t{s} rdfs:label ?itemlabel .
\t{s} event:time ?t .
\tOPTIONAL {{{s} event:agent ?agent}} .
\tOPTIONAL {{?site rdfs:label ?eventPlace}} .
\t?t time:hasBeginning ?hasB .
\t?hasB time:inXSDDateTime ?timeStart .
\t?site locn:address ?a .
\t?a locn:fullAddress ?address .
\tOPTIONAL {{{s} rdfs:comment ?description}} .
\tOPTIONAL {{{s} foaf:homepage ?homepage}} .
\tOPTIONAL {{?agent rdfs:label ?partname}} .
\tOPTIONAL {{{s} foaf:depiction ?depiction}} .
\tOPTIONAL {{?t time:hasEnd ?hasE . ?hasE time:inXSDDateTime ?timeEnd}} .
\tOPTIONAL {{{s} foaf:logo ?logo}} .
\tOPTIONAL {{?post sioc:about {s} .
\t\t?post dc:title ?ptitle .
\t\t?post rdfs:label ?plabel .
\t\t?post sioc:has_creator ?pc .
\t\t?pc rdfs:label ?pcreat .
\t}} .
"
    ));
}

/// Trimmed text of an optional clause; blank text counts as absent.
fn non_blank(text: &Option<String>) -> Option<&str> {
    text.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn validate_iri(iri: &str) -> Result<(), QueryError> {
    let forbidden = |c: char| {
        c.is_whitespace()
            || c.is_control()
            || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
    };
    if iri.is_empty() || iri.chars().any(forbidden) {
        return Err(QueryError::InvalidIri(iri.to_string()));
    }
    Ok(())
}
