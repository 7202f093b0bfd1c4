//! Schema unification
//!
//! The party columns of a run are fixed from the first municipality that is
//! parsed successfully. Every later municipality is projected onto that
//! order: missing parties count as 0, parties unknown to the header are
//! dropped and reported back to the caller.

use super::TallyMap;

/// Ordered party columns of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaHeader {
    categories: Vec<String>,
}

impl SchemaHeader {
    pub fn new(categories: Vec<String>) -> Self {
        Self { categories }
    }

    /// Header in the key order of a tally map
    pub fn from_tallies(tallies: &TallyMap) -> Self {
        Self::new(tallies.keys().cloned().collect())
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Looks every header category up in `tallies`, substituting 0 when absent
    pub fn project(&self, tallies: &TallyMap) -> Projection {
        let counts = self
            .categories
            .iter()
            .map(|c| tallies.get(c).copied().unwrap_or(0))
            .collect();

        let dropped = tallies
            .keys()
            .filter(|k| !self.categories.contains(k))
            .cloned()
            .collect();

        Projection { counts, dropped }
    }
}

/// Counts of one municipality aligned to a [`SchemaHeader`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// One count per header category, in header order
    pub counts: Vec<u64>,

    /// Categories present in the tallies but absent from the header
    pub dropped: Vec<String>,
}

/// Projects `tallies` onto `prior`, or fixes the header from `tallies` when
/// there is no prior header yet
///
/// # Examples
///
/// ```
/// use tally_harvest::dataset::{unify, SchemaHeader, TallyMap};
///
/// let mut tallies = TallyMap::new();
/// tallies.insert("A".to_string(), 5);
///
/// let prior = SchemaHeader::new(vec!["A".to_string(), "B".to_string()]);
/// let (header, projection) = unify(Some(&prior), &tallies);
/// assert_eq!(header, prior);
/// assert_eq!(projection.counts, vec![5, 0]);
/// ```
pub fn unify(prior: Option<&SchemaHeader>, tallies: &TallyMap) -> (SchemaHeader, Projection) {
    match prior {
        Some(header) => (header.clone(), header.project(tallies)),
        None => {
            let header = SchemaHeader::from_tallies(tallies);
            let projection = Projection {
                counts: tallies.values().copied().collect(),
                dropped: Vec::new(),
            };
            (header, projection)
        }
    }
}

/// Holds the run's header; fixes it exactly once, on the first projection
#[derive(Debug, Default)]
pub struct SchemaUnifier {
    header: Option<SchemaHeader>,
}

impl SchemaUnifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects `tallies` onto the run's header, fixing it first if needed
    pub fn project(&mut self, tallies: &TallyMap) -> Projection {
        match &self.header {
            Some(header) => header.project(tallies),
            None => {
                let (header, projection) = unify(None, tallies);
                tracing::debug!("Fixed party columns: {:?}", header.categories());
                self.header = Some(header);
                projection
            }
        }
    }

    pub fn header(&self) -> Option<&SchemaHeader> {
        self.header.as_ref()
    }

    /// Consumes the unifier, yielding the fixed header (empty if never fixed)
    pub fn into_header(self) -> SchemaHeader {
        self.header.unwrap_or_default()
    }
}
