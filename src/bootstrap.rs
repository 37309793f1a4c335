//! Synthetic canonical data for empty environments.
//!
//! A deployment convenience, not a correctness requirement: when the
//! canonical snapshot is missing, [`load_or_bootstrap`] synthesizes one so
//! demos and development environments start with a populated store. Real
//! deployments should supply a real snapshot instead.
//!
//! The generator also derives "messy leads" from a loaded store - noisy
//! free-text mentions with known ground-truth ids - used to exercise the
//! resolution path in tests and benchmarks.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::DataError;
use crate::record::CanonicalRecord;
use crate::store::CanonicalStore;

/// Records synthesized by default when bootstrapping a missing snapshot.
pub const DEFAULT_RECORD_COUNT: usize = 100;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "Dan", "Erin", "Frank", "Grace", "Henry", "Irene", "Jack", "Karen",
    "Liam", "Maria", "Noah", "Olivia", "Paul", "Quinn", "Rosa", "Sam", "Tara",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Jones", "Lee", "Wu", "Garcia", "Miller", "Davis", "Wilson", "Moore", "Taylor",
    "Anderson", "Thomas", "Jackson", "White", "Harris", "Martin", "Thompson", "Young", "King",
    "Lopez",
];

const ORGANIZATION_STEMS: &[&str] = &[
    "Acme", "Globex", "Initech", "Umbrella", "Stark", "Wayne", "Hooli", "Vandelay", "Wonka",
    "Cyberdyne", "Tyrell", "Aperture",
];

const ORGANIZATION_SUFFIXES: &[&str] = &["Inc", "LLC", "Group", "Labs", "Ltd"];

const ROLES: &[&str] = &[
    "Engineer",
    "Designer",
    "Director",
    "Account Manager",
    "Analyst",
    "Product Manager",
    "Consultant",
    "VP Sales",
    "Researcher",
    "Operations Lead",
];

/// A noisy lead mention with its ground-truth record id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessyLead {
    /// Free-text mention, e.g. `"alice smith working at Acme"`.
    pub raw_text: String,
    /// Id of the canonical record the mention was derived from.
    pub true_id: String,
}

/// Synthesizes `count` canonical records with uuid-v4 ids.
pub fn synthetic_records(count: usize, rng: &mut impl Rng) -> Vec<CanonicalRecord> {
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let first = *FIRST_NAMES.choose(rng).unwrap_or(&"Alex");
        let last = *LAST_NAMES.choose(rng).unwrap_or(&"Doe");
        let stem = *ORGANIZATION_STEMS.choose(rng).unwrap_or(&"Acme");
        let suffix = *ORGANIZATION_SUFFIXES.choose(rng).unwrap_or(&"Inc");
        let role = *ROLES.choose(rng).unwrap_or(&"Engineer");

        let contact_address = format!(
            "{}.{}@{}.example.com",
            first.to_lowercase(),
            last.to_lowercase(),
            stem.to_lowercase()
        );

        records.push(
            CanonicalRecord::new(
                Uuid::new_v4().to_string(),
                format!("{first} {last}"),
                format!("{stem} {suffix}"),
            )
            .with_contact_address(contact_address)
            .with_role(role),
        );
    }
    records
}

/// Derives noisy lead mentions from roughly half the store's records.
///
/// Noise model: the name is lowercased with probability 0.5, and only the
/// first word of the organization survives.
pub fn messy_leads(store: &CanonicalStore, rng: &mut impl Rng) -> Vec<MessyLead> {
    let records = store.records();
    let sample_size = records.len() / 2;

    records
        .choose_multiple(rng, sample_size)
        .map(|record| {
            let name = if rng.gen_bool(0.5) {
                record.name.to_lowercase()
            } else {
                record.name.clone()
            };
            let organization_word = record
                .organization
                .split_whitespace()
                .next()
                .unwrap_or_default();

            MessyLead {
                raw_text: format!("{name} working at {organization_word}"),
                true_id: record.id.clone(),
            }
        })
        .collect()
}

/// Writes records as a canonical CSV snapshot.
///
/// # Errors
/// `SnapshotWrite` if the file cannot be created or written.
pub fn write_canonical_csv(
    path: impl AsRef<Path>,
    records: &[CanonicalRecord],
) -> Result<(), DataError> {
    let path = path.as_ref();
    let snapshot_err = |message: String| DataError::SnapshotWrite {
        path: path.to_path_buf(),
        message,
    };

    let mut writer = csv::Writer::from_path(path).map_err(|e| snapshot_err(e.to_string()))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| snapshot_err(e.to_string()))?;
    }
    writer.flush().map_err(|e| snapshot_err(e.to_string()))
}

/// Synthesizes a snapshot at `path` and returns the generated records.
///
/// # Errors
/// `SnapshotWrite` if the snapshot cannot be written.
pub fn generate_canonical_csv(
    path: impl AsRef<Path>,
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<CanonicalRecord>, DataError> {
    let records = synthetic_records(count, rng);
    write_canonical_csv(&path, &records)?;
    info!(
        records = records.len(),
        path = %path.as_ref().display(),
        "synthetic canonical snapshot written"
    );
    Ok(records)
}

/// Loads the store at `path`, synthesizing a snapshot first if the file
/// does not exist.
///
/// # Errors
/// Any [`DataError`] from generation or loading.
pub fn load_or_bootstrap(path: impl AsRef<Path>) -> Result<CanonicalStore, DataError> {
    let path = path.as_ref();
    if !path.is_file() {
        info!(path = %path.display(), "canonical source missing, bootstrapping");
        generate_canonical_csv(path, DEFAULT_RECORD_COUNT, &mut rand::thread_rng())?;
    }
    CanonicalStore::load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_synthetic_records_shape() {
        let records = synthetic_records(25, &mut rng());
        assert_eq!(records.len(), 25);
        for record in &records {
            assert!(!record.id.is_empty());
            assert!(record.name.contains(' '));
            assert!(record.organization.contains(' '));
            assert!(record.contact_address.contains('@'));
            assert!(!record.role.is_empty());
        }
    }

    #[test]
    fn test_synthetic_ids_unique() {
        let records = synthetic_records(50, &mut rng());
        let ids: std::collections::HashSet<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm.csv");

        let records = generate_canonical_csv(&path, 10, &mut rng()).unwrap();
        let store = CanonicalStore::load(&path).unwrap();

        assert_eq!(store.len(), 10);
        assert_eq!(store.records(), &records[..]);
    }

    #[test]
    fn test_load_or_bootstrap_creates_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm.csv");
        assert!(!path.exists());

        let store = load_or_bootstrap(&path).unwrap();
        assert_eq!(store.len(), DEFAULT_RECORD_COUNT);
        assert!(path.is_file());
    }

    #[test]
    fn test_load_or_bootstrap_keeps_existing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm.csv");
        write_canonical_csv(&path, &[CanonicalRecord::new("9", "Carol Lee", "Globex")]).unwrap();

        let store = load_or_bootstrap(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].name, "Carol Lee");
    }

    #[test]
    fn test_messy_leads_noise_model() {
        let store =
            CanonicalStore::from_records(synthetic_records(40, &mut rng()), "fixture").unwrap();
        let leads = messy_leads(&store, &mut rng());

        assert_eq!(leads.len(), 20);
        for lead in &leads {
            assert!(lead.raw_text.contains(" working at "));
            assert!(store.records().iter().any(|r| r.id == lead.true_id));
            // Only the first organization word survives.
            for suffix in ORGANIZATION_SUFFIXES {
                assert!(!lead.raw_text.contains(suffix));
            }
        }
    }
}
