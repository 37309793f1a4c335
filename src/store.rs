//! Canonical store: the in-memory reference table.
//!
//! The store loads a flat CSV snapshot (header row required; columns `id`,
//! `name`, `organization`, `contact_address`, `role`), normalizes absent
//! fields to empty strings, and precomputes one fingerprint per record for
//! the similarity index. The store is immutable after load; rebuilding the
//! index or graph means reloading the whole snapshot.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::DataError;
use crate::record::CanonicalRecord;

/// Default number of rows returned by [`CanonicalStore::preview`].
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Snapshot metadata and leading rows, for transparency endpoints and debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorePreview {
    /// Total number of records in the store.
    pub total_records: usize,
    /// The first `n` records, verbatim, in source row order.
    pub rows: Vec<CanonicalRecord>,
    /// Name of the backing source (file name or upload label).
    pub source_name: String,
}

/// In-memory table of canonical records.
#[derive(Debug, Clone)]
pub struct CanonicalStore {
    records: Vec<CanonicalRecord>,
    fingerprints: Vec<String>,
    source_name: String,
    loaded_at: DateTime<Utc>,
}

impl CanonicalStore {
    /// Loads a store from a CSV snapshot on disk.
    ///
    /// # Errors
    /// - `SourceMissing` if the file does not exist
    /// - `Unreadable` if it cannot be opened or read
    /// - `MalformedRow` if a row fails CSV/field decoding
    /// - `DuplicateId` if two rows share an id
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let source_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                DataError::SourceMissing {
                    path: path.to_path_buf(),
                }
            } else {
                DataError::Unreadable {
                    source_name: source_name.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        Self::load_from_reader(file, source_name)
    }

    /// Loads a store from any reader yielding CSV bytes (uploads, tests).
    ///
    /// # Errors
    /// Same taxonomy as [`CanonicalStore::load`], minus `SourceMissing`.
    pub fn load_from_reader<R: io::Read>(
        reader: R,
        source_name: impl Into<String>,
    ) -> Result<Self, DataError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let mut records = Vec::new();
        for (i, row) in csv_reader.deserialize::<CanonicalRecord>().enumerate() {
            let record = row.map_err(|e| DataError::MalformedRow {
                // 1-based data row, not counting the header
                row: i + 1,
                message: e.to_string(),
            })?;
            records.push(record);
        }

        Self::from_records(records, source_name)
    }

    /// Builds a store from already-decoded records.
    ///
    /// # Errors
    /// `DuplicateId` if two records share an id.
    pub fn from_records(
        records: Vec<CanonicalRecord>,
        source_name: impl Into<String>,
    ) -> Result<Self, DataError> {
        let source_name = source_name.into();

        let mut seen = std::collections::HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                return Err(DataError::DuplicateId {
                    id: record.id.clone(),
                });
            }
        }

        let fingerprints = records.iter().map(CanonicalRecord::fingerprint).collect();
        let store = Self {
            records,
            fingerprints,
            source_name,
            loaded_at: Utc::now(),
        };

        info!(
            records = store.records.len(),
            source = %store.source_name,
            "canonical store loaded"
        );
        Ok(store)
    }

    /// All records, in source row order.
    #[must_use]
    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    /// One fingerprint per record, aligned with [`CanonicalStore::records`].
    #[must_use]
    pub fn fingerprints(&self) -> &[String] {
        &self.fingerprints
    }

    /// Number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Name of the backing source.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// When this snapshot was loaded.
    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Total count plus the first `n` records verbatim (no shuffling).
    #[must_use]
    pub fn preview(&self, n: usize) -> StorePreview {
        StorePreview {
            total_records: self.records.len(),
            rows: self.records.iter().take(n).cloned().collect(),
            source_name: self.source_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT: &str = "\
id,name,organization,contact_address,role
1,Alice Smith,Acme Inc,alice@acme.example.com,Engineer
2,Bob Jones,Acme Inc,bob@acme.example.com,Designer
3,Carol Lee,Globex,carol@globex.example.com,Director
";

    fn store() -> CanonicalStore {
        CanonicalStore::load_from_reader(SNAPSHOT.as_bytes(), "test.csv").unwrap()
    }

    #[test]
    fn test_load_from_reader() {
        let store = store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.records()[0].name, "Alice Smith");
        assert_eq!(store.records()[2].organization, "Globex");
        assert_eq!(store.source_name(), "test.csv");
    }

    #[test]
    fn test_fingerprints_aligned_with_records() {
        let store = store();
        assert_eq!(store.fingerprints().len(), store.len());
        assert_eq!(store.fingerprints()[0], "Alice Smith Acme Inc");
        assert_eq!(store.fingerprints()[2], "Carol Lee Globex");
    }

    #[test]
    fn test_missing_fields_normalized_to_empty() {
        let data = "id,name,organization,contact_address,role\n4,Dan Wu,,,\n";
        let store = CanonicalStore::load_from_reader(data.as_bytes(), "sparse.csv").unwrap();
        let record = &store.records()[0];
        assert_eq!(record.organization, "");
        assert_eq!(record.contact_address, "");
        // Fingerprint still defined
        assert_eq!(store.fingerprints()[0], "Dan Wu ");
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let data = "id,name,organization\n1,Alice Smith,Acme Inc\n1,Bob Jones,Acme Inc\n";
        let err = CanonicalStore::load_from_reader(data.as_bytes(), "dup.csv").unwrap_err();
        assert!(matches!(err, DataError::DuplicateId { id } if id == "1"));
    }

    #[test]
    fn test_malformed_row_reported_with_row_number() {
        let data = "id,name,organization\n1,\"unterminated,Acme\n";
        let err = CanonicalStore::load_from_reader(data.as_bytes(), "bad.csv").unwrap_err();
        assert!(matches!(err, DataError::MalformedRow { .. }));
    }

    #[test]
    fn test_missing_file_is_source_missing() {
        let err = CanonicalStore::load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DataError::SourceMissing { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let store = CanonicalStore::load(&path).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.source_name(), "crm.csv");
    }

    #[test]
    fn test_preview_keeps_source_order() {
        let store = store();
        let preview = store.preview(2);
        assert_eq!(preview.total_records, 3);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0].id, "1");
        assert_eq!(preview.rows[1].id, "2");
        assert_eq!(preview.source_name, "test.csv");
    }

    #[test]
    fn test_preview_larger_than_store() {
        let store = store();
        let preview = store.preview(100);
        assert_eq!(preview.rows.len(), 3);
    }

    #[test]
    fn test_header_only_snapshot_loads_empty() {
        let data = "id,name,organization,contact_address,role\n";
        let store = CanonicalStore::load_from_reader(data.as_bytes(), "empty.csv").unwrap();
        assert!(store.is_empty());
        assert_eq!(store.preview(5).total_records, 0);
    }
}
