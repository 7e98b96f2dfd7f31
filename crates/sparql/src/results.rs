//! `application/sparql-results+json` payloads.

use std::collections::HashMap;

use common::Row;
use serde::Deserialize;

use crate::Result;

/// A SPARQL `SELECT` result set as served by the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    pub head: Head,
    pub results: Solutions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Head {
    /// Projected variable names.
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Solutions {
    pub bindings: Vec<HashMap<String, Term>>,
}

/// One bound value in a solution.
#[derive(Debug, Clone, Deserialize)]
pub struct Term {
    #[serde(rename = "type")]
    pub kind: TermKind,
    pub value: String,
    #[serde(default)]
    pub datatype: Option<String>,
    #[serde(default, rename = "xml:lang")]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TermKind {
    Uri,
    Literal,
    /// Emitted by older endpoints for literals carrying a datatype.
    TypedLiteral,
    Bnode,
}

impl SparqlResults {
    /// Converts each solution into a [`Row`], keeping only the lexical values.
    ///
    /// Solutions keep their order; unbound variables are absent from the row.
    pub fn into_rows(self) -> Vec<Row> {
        self.results
            .bindings
            .into_iter()
            .map(|solution| -> Row {
                solution
                    .into_iter()
                    .map(|(name, term)| (name, term.value))
                    .collect()
            })
            .collect()
    }
}

/// Parses a result payload into rows.
pub fn parse_rows(body: &[u8]) -> Result<Vec<Row>> {
    let results: SparqlResults = serde_json::from_slice(body)?;
    Ok(results.into_rows())
}
