//! Lead resolution.
//!
//! The [`Resolver`] owns the canonical store, the similarity index, and the
//! relationship graph; the three are built together and never mutated
//! independently. Resolution is read-only against this shared state, so one
//! resolver behind an `Arc` serves any number of concurrent callers without
//! locking.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::QueryError;
use crate::graph::RelationshipGraph;
use crate::index::SimilarityIndex;
use crate::record::CanonicalRecord;
use crate::store::{CanonicalStore, StorePreview};

/// Minimum similarity score a best match must exceed (strictly) to be
/// accepted. Independent of [`HIGH_CONFIDENCE_THRESHOLD`].
pub const MATCH_THRESHOLD: f32 = 0.6;

/// Score above which a bulk summary is labeled [`ConfidenceLabel::High`].
/// Independent of [`MATCH_THRESHOLD`]; do not derive one from the other.
pub const HIGH_CONFIDENCE_THRESHOLD: f32 = 0.8;

/// Maximum number of colleague names attached to a match.
pub const COLLEAGUE_LIMIT: usize = 3;

/// Sentinel name reported in summaries when no record was matched.
pub const NO_MATCH_NAME: &str = "No Match";

/// Sentinel organization reported in summaries when no record was matched.
pub const NO_MATCH_ORGANIZATION: &str = "-";

/// Outcome of a single resolution attempt. Ephemeral, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// The raw query text as received.
    pub query: String,

    /// Best cosine similarity score across the store, in `[0.0, 1.0]`.
    pub match_score: f32,

    /// Whether the best score strictly exceeded the acceptance threshold.
    pub match_found: bool,

    /// The matched record, when `match_found` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_details: Option<CanonicalRecord>,

    /// Up to [`COLLEAGUE_LIMIT`] other people at the matched organization.
    pub potential_colleagues: Vec<String>,

    /// Captured diagnostic when scoring failed; the call itself never errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MatchResult {
    fn no_match(query: &str, score: f32) -> Self {
        Self {
            query: query.to_string(),
            match_score: score,
            match_found: false,
            match_details: None,
            potential_colleagues: Vec::new(),
            error: None,
        }
    }

    fn failed(query: &str, error: &QueryError) -> Self {
        Self {
            query: query.to_string(),
            match_score: 0.0,
            match_found: false,
            match_details: None,
            potential_colleagues: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Coarse confidence label attached to bulk summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLabel {
    /// Score strictly above [`HIGH_CONFIDENCE_THRESHOLD`].
    High,
    /// Everything else, including no-match rows.
    Low,
}

impl ConfidenceLabel {
    /// Label for a raw similarity score.
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        if score > HIGH_CONFIDENCE_THRESHOLD {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// One bulk-resolution output row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSummary {
    /// The raw lead text, verbatim.
    pub original: String,
    /// Matched record's name, or [`NO_MATCH_NAME`].
    pub suggested_name: String,
    /// Matched record's organization, or [`NO_MATCH_ORGANIZATION`].
    pub suggested_organization: String,
    /// Best similarity score.
    pub score: f32,
    /// Coarse label derived from the score alone.
    pub confidence: ConfidenceLabel,
}

impl LeadSummary {
    fn from_match(result: &MatchResult) -> Self {
        let (suggested_name, suggested_organization) = match &result.match_details {
            Some(record) => (record.name.clone(), record.organization.clone()),
            None => (NO_MATCH_NAME.to_string(), NO_MATCH_ORGANIZATION.to_string()),
        };
        Self {
            original: result.query.clone(),
            suggested_name,
            suggested_organization,
            score: result.match_score,
            confidence: ConfidenceLabel::from_score(result.match_score),
        }
    }
}

/// Resolves free-text lead mentions against the canonical store.
#[derive(Debug)]
pub struct Resolver {
    store: CanonicalStore,
    index: SimilarityIndex,
    graph: RelationshipGraph,
}

impl Resolver {
    /// Builds the index and graph from the store and takes ownership of all
    /// three. Construct once at startup and share behind an `Arc`.
    #[must_use]
    pub fn new(store: CanonicalStore) -> Self {
        let index = SimilarityIndex::fit(store.fingerprints());
        let graph = RelationshipGraph::build(&store);
        info!(
            records = store.len(),
            vocabulary = index.vocabulary_len(),
            source = store.source_name(),
            "resolver built"
        );
        Self {
            store,
            index,
            graph,
        }
    }

    /// The canonical store backing this resolver.
    #[must_use]
    pub fn store(&self) -> &CanonicalStore {
        &self.store
    }

    /// Snapshot metadata and the first `n` records, in source order.
    #[must_use]
    pub fn preview(&self, n: usize) -> StorePreview {
        self.store.preview(n)
    }

    /// Resolves `text` with the default [`MATCH_THRESHOLD`].
    #[must_use]
    pub fn resolve(&self, text: &str) -> MatchResult {
        self.resolve_with_threshold(text, MATCH_THRESHOLD)
    }

    /// Resolves `text` against the store.
    ///
    /// Never returns an error: scoring failures (empty text, empty index,
    /// numeric breakdown) are captured into the result's `error` field with
    /// a zero score and no match.
    #[must_use]
    pub fn resolve_with_threshold(&self, text: &str, threshold: f32) -> MatchResult {
        match self.try_resolve(text, threshold) {
            Ok(result) => result,
            Err(error) => {
                warn!(query = text, %error, "resolution failed, reporting zero score");
                MatchResult::failed(text, &error)
            }
        }
    }

    fn try_resolve(&self, text: &str, threshold: f32) -> Result<MatchResult, QueryError> {
        if text.trim().is_empty() {
            return Err(QueryError::EmptyQuery);
        }

        let (best_index, best_score) = self.index.best_match(text).ok_or(QueryError::EmptyIndex)?;
        if !best_score.is_finite() {
            return Err(QueryError::Scoring {
                message: format!("non-finite score for record {best_index}"),
            });
        }

        // Strict inequality: a score exactly at the threshold is not a match.
        if best_score <= threshold {
            debug!(query = text, score = best_score, "below threshold, no match");
            return Ok(MatchResult::no_match(text, best_score));
        }

        let record = self.store.records()[best_index].clone();
        let potential_colleagues =
            self.graph
                .colleagues_of(&record.organization, &record.name, COLLEAGUE_LIMIT);
        debug!(
            query = text,
            score = best_score,
            matched = %record.id,
            colleagues = potential_colleagues.len(),
            "match accepted"
        );

        Ok(MatchResult {
            query: text.to_string(),
            match_score: best_score,
            match_found: true,
            match_details: Some(record),
            potential_colleagues,
            error: None,
        })
    }

    /// Resolves a batch of raw lead texts with the default threshold.
    ///
    /// Output order and length match the input; a failing row yields its
    /// no-match summary and never aborts the rest of the batch.
    pub fn bulk_resolve<I, S>(&self, texts: I) -> Vec<LeadSummary>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|text| {
                let result = self.resolve(text.as_ref());
                LeadSummary::from_match(&result)
            })
            .collect()
    }
}
