//! # Leadlink - Lead Entity Resolution
//!
//! Leadlink resolves noisy, free-text lead mentions (e.g. `"mr. john smith
//! at acme inc"`) to canonical records in a small reference database, and
//! surfaces related entities - colleagues at the same organization - for
//! each resolved match.
//!
//! ## Core Concepts
//!
//! - **CanonicalRecord**: one clean row of the reference store
//! - **Fingerprint**: the record's name and organization joined by a space,
//!   the unit of similarity comparison
//! - **SimilarityIndex**: a character n-gram TF-IDF vector space fit once
//!   over all fingerprints, queried by cosine similarity
//! - **RelationshipGraph**: an undirected graph linking each person to their
//!   organization, used to surface colleagues
//! - **Resolver**: owns all three, applies the acceptance threshold, and
//!   never lets one bad lead crash a batch
//!
//! ## Usage
//!
//! ```
//! use leadlink::{CanonicalRecord, CanonicalStore, Resolver};
//!
//! let store = CanonicalStore::from_records(
//!     vec![
//!         CanonicalRecord::new("1", "Alice Smith", "Acme Inc"),
//!         CanonicalRecord::new("2", "Bob Jones", "Acme Inc"),
//!     ],
//!     "demo",
//! )
//! .unwrap();
//!
//! let resolver = Resolver::new(store);
//! let result = resolver.resolve("alice smith at acme");
//! assert!(result.match_found);
//! assert_eq!(result.potential_colleagues, vec!["Bob Jones".to_string()]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bootstrap;
pub mod error;
pub mod graph;
pub mod index;
pub mod ingest;
pub mod record;
pub mod resolver;
pub mod store;

#[cfg(feature = "server")]
pub mod http;

// Re-export primary types at crate root for convenience
pub use bootstrap::{load_or_bootstrap, MessyLead};
pub use error::{DataError, LeadError, LeadResult, QueryError};
pub use graph::{NodeKind, RelationshipGraph, WORKS_AT};
pub use index::SimilarityIndex;
pub use record::CanonicalRecord;
pub use resolver::{
    ConfidenceLabel, LeadSummary, MatchResult, Resolver, COLLEAGUE_LIMIT,
    HIGH_CONFIDENCE_THRESHOLD, MATCH_THRESHOLD,
};
pub use store::{CanonicalStore, StorePreview};
