//! Character n-gram similarity index.
//!
//! A TF-IDF vector space over word-boundary-aware character n-grams
//! (lengths 2 to 4), fit once over the canonical fingerprints. Queries are
//! vectorized with the fixed fit vocabulary and compared by cosine
//! similarity against every fitted record. The index is immutable after
//! `fit`; rebuilding requires reloading the store.
//!
//! The analyzer pads each whitespace-separated word with a leading and a
//! trailing space before extracting n-grams, so `"acme"` produces `" a"`,
//! `"ac"`, ... `"e "`. The boundary grams let short noisy mentions match
//! their canonical spelling. A word shorter than the window is emitted once,
//! whole. N-grams never cross word boundaries.

use std::collections::HashMap;

use tracing::debug;

/// Smallest n-gram length extracted by the analyzer.
pub const MIN_NGRAM: usize = 2;

/// Largest n-gram length extracted by the analyzer.
pub const MAX_NGRAM: usize = 4;

/// A sparse, L2-normalized TF-IDF vector. Terms sorted by vocabulary id.
#[derive(Debug, Clone, Default)]
struct SparseVector {
    terms: Vec<(usize, f32)>,
}

impl SparseVector {
    /// Builds a normalized vector from raw term counts and IDF weights.
    ///
    /// Returns the zero vector when no term carries weight.
    fn from_counts(counts: &HashMap<usize, u32>, idf: &[f32]) -> Self {
        let mut terms: Vec<(usize, f32)> = counts
            .iter()
            .map(|(&term, &count)| (term, count as f32 * idf[term]))
            .collect();
        terms.sort_unstable_by_key(|&(term, _)| term);

        let mut norm2 = 0.0f64;
        for &(_, w) in &terms {
            norm2 += f64::from(w) * f64::from(w);
        }
        if norm2 > 0.0 {
            let inv = norm2.sqrt().recip();
            for (_, w) in &mut terms {
                let scaled = f64::from(*w) * inv;
                #[allow(clippy::cast_possible_truncation)]
                let truncated = scaled as f32;
                *w = truncated;
            }
        }

        Self { terms }
    }

    /// Dot product of two normalized sparse vectors (cosine similarity).
    fn dot(&self, other: &Self) -> f32 {
        let mut sum = 0.0f64;
        let (mut i, mut j) = (0, 0);
        while i < self.terms.len() && j < other.terms.len() {
            let (a_term, a_weight) = self.terms[i];
            let (b_term, b_weight) = other.terms[j];
            match a_term.cmp(&b_term) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += f64::from(a_weight) * f64::from(b_weight);
                    i += 1;
                    j += 1;
                }
            }
        }
        #[allow(clippy::cast_possible_truncation)]
        let sim = sum as f32;
        sim.clamp(0.0, 1.0)
    }
}

/// Immutable character n-gram vector space over the fitted fingerprints.
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    vectors: Vec<SparseVector>,
}

impl SimilarityIndex {
    /// Fits the vector space over an ordered sequence of fingerprints.
    ///
    /// The vocabulary is derived entirely from this corpus; n-grams first
    /// seen in later queries contribute zero weight. IDF uses smoothed
    /// document frequencies: `ln((1 + docs) / (1 + df)) + 1`.
    #[must_use]
    pub fn fit<S: AsRef<str>>(fingerprints: &[S]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_grams: Vec<Vec<usize>> = Vec::with_capacity(fingerprints.len());
        let mut df: Vec<u32> = Vec::new();

        for fingerprint in fingerprints {
            let grams = analyze(fingerprint.as_ref());
            let mut ids = Vec::with_capacity(grams.len());
            let mut seen_in_doc = std::collections::HashSet::new();
            for gram in grams {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(gram).or_insert(next_id);
                if id == df.len() {
                    df.push(0);
                }
                if seen_in_doc.insert(id) {
                    df[id] += 1;
                }
                ids.push(id);
            }
            doc_grams.push(ids);
        }

        #[allow(clippy::cast_precision_loss)]
        let docs = fingerprints.len() as f64;
        let idf: Vec<f32> = df
            .iter()
            .map(|&d| {
                let ratio = (1.0 + docs) / (1.0 + f64::from(d));
                #[allow(clippy::cast_possible_truncation)]
                let weight = (ratio.ln() + 1.0) as f32;
                weight
            })
            .collect();

        let vectors = doc_grams
            .iter()
            .map(|ids| {
                let mut counts: HashMap<usize, u32> = HashMap::new();
                for &id in ids {
                    *counts.entry(id).or_insert(0) += 1;
                }
                SparseVector::from_counts(&counts, &idf)
            })
            .collect();

        let index = Self {
            vocabulary,
            idf,
            vectors,
        };
        debug!(
            records = index.vectors.len(),
            vocabulary = index.vocabulary.len(),
            "similarity index fitted"
        );
        index
    }

    /// Number of fitted records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns true if no records were fitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Number of distinct n-grams in the fit vocabulary.
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine similarity of `text` against every fitted record, in fit order.
    ///
    /// Scores are in `[0.0, 1.0]`. A query with no recognized n-grams scores
    /// 0.0 against every record; this is not an error.
    #[must_use]
    pub fn query(&self, text: &str) -> Vec<f32> {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for gram in analyze(text) {
            if let Some(&id) = self.vocabulary.get(&gram) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let query_vector = SparseVector::from_counts(&counts, &self.idf);

        self.vectors.iter().map(|v| query_vector.dot(v)).collect()
    }

    /// Highest-scoring record for `text`: first index attaining the maximum.
    ///
    /// Returns `None` only when the index holds no fitted records.
    #[must_use]
    pub fn best_match(&self, text: &str) -> Option<(usize, f32)> {
        let scores = self.query(text);
        let mut best: Option<(usize, f32)> = None;
        for (i, &score) in scores.iter().enumerate() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best
    }
}

/// Word-boundary-aware character n-gram extraction.
///
/// Lowercases, splits on whitespace, pads each word with one space on each
/// side, then slides windows of length [`MIN_NGRAM`]..=[`MAX_NGRAM`]. A word
/// shorter than the current window is emitted once, whole, and larger
/// windows are skipped for it.
fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut grams = Vec::new();

    for word in lowered.split_whitespace() {
        let padded: Vec<char> = std::iter::once(' ')
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        let len = padded.len();

        for n in MIN_NGRAM..=MAX_NGRAM {
            if n >= len {
                grams.push(padded.iter().collect());
                break;
            }
            for offset in 0..=(len - n) {
                grams.push(padded[offset..offset + n].iter().collect());
            }
        }
    }

    grams
}
