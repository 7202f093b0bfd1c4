//! Typed data model of a harvest
//!
//! A run discovers [`SubEntity`] values on the listing page, extracts a
//! [`SummaryStats`] and a [`TallyMap`] from every detail page, projects the
//! tallies onto the run's [`SchemaHeader`], and collects the resulting
//! [`Row`]s into a [`Dataset`].

mod schema;

pub use schema::{unify, Projection, SchemaHeader, SchemaUnifier};

use indexmap::IndexMap;
use std::fmt;

/// Fixed leading columns of every dataset
pub const FIXED_COLUMNS: [&str; 5] = ["code", "location", "registered", "envelopes", "valid"];

/// A municipality discovered on the listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubEntity {
    /// Municipality code (the anchor text)
    pub code: u32,

    /// Display name (text of the next table cell)
    pub name: String,

    /// Absolute URL of the municipality's detail page
    pub detail_url: String,
}

/// The three summary statistics of one municipality
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryStats {
    /// Registered voters
    pub registered: u64,

    /// Envelopes issued
    pub envelopes_issued: u64,

    /// Valid votes
    pub valid_count: u64,
}

/// Party name to vote count, in order of first appearance on the page
pub type TallyMap = IndexMap<String, u64>;

/// A single typed output field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(u64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// One output row, its counts aligned to the run's schema header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub code: u32,
    pub name: String,
    pub summary: SummaryStats,
    pub counts: Vec<u64>,
}

impl Row {
    /// Assembles a row from a municipality, its summary, and projected counts
    pub fn new(entity: &SubEntity, summary: SummaryStats, counts: Vec<u64>) -> Self {
        Self {
            code: entity.code,
            name: entity.name.clone(),
            summary,
            counts,
        }
    }

    /// Ordered field values: the fixed columns followed by the counts
    pub fn values(&self) -> Vec<Value> {
        let mut values = Vec::with_capacity(FIXED_COLUMNS.len() + self.counts.len());
        values.push(Value::Int(u64::from(self.code)));
        values.push(Value::Text(self.name.clone()));
        values.push(Value::Int(self.summary.registered));
        values.push(Value::Int(self.summary.envelopes_issued));
        values.push(Value::Int(self.summary.valid_count));
        values.extend(self.counts.iter().copied().map(Value::Int));
        values
    }
}

/// The finished table: fixed columns plus party columns, one row per municipality
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    schema: SchemaHeader,
    rows: Vec<Row>,
}

impl Dataset {
    /// Finalizes a dataset from the run's schema header and its rows
    pub fn new(schema: SchemaHeader, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    /// Full output header: `code, location, registered, envelopes, valid, <parties...>`
    pub fn header(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.schema.categories().iter().cloned())
            .collect()
    }

    pub fn schema(&self) -> &SchemaHeader {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows rendered as ordered field values
    pub fn records(&self) -> Vec<Vec<Value>> {
        self.rows.iter().map(Row::values).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
