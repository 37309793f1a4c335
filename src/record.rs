//! Canonical record type.
//!
//! A [`CanonicalRecord`] is one row of the reference database: the clean,
//! trusted version of an entity that noisy lead text is resolved against.
//! Every text field deserializes missing values to the empty string, never
//! null, so fingerprint concatenation is always defined.

use serde::{Deserialize, Serialize};

/// One row of the canonical reference store.
///
/// # Examples
///
/// ```
/// use leadlink::CanonicalRecord;
///
/// let record = CanonicalRecord::new("1", "Alice Smith", "Acme Inc");
/// assert_eq!(record.fingerprint(), "Alice Smith Acme Inc");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Unique identifier. Stable, never reused.
    #[serde(default)]
    pub id: String,

    /// Display name of the person.
    #[serde(default)]
    pub name: String,

    /// Organization the person belongs to.
    #[serde(default)]
    pub organization: String,

    /// Contact address (e.g. an email address).
    #[serde(default)]
    pub contact_address: String,

    /// Role or title within the organization.
    #[serde(default)]
    pub role: String,
}

impl CanonicalRecord {
    /// Creates a record with the identity fields set and the rest empty.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        organization: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            organization: organization.into(),
            contact_address: String::new(),
            role: String::new(),
        }
    }

    /// Sets the contact address.
    #[must_use]
    pub fn with_contact_address(mut self, contact_address: impl Into<String>) -> Self {
        self.contact_address = contact_address.into();
        self
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Derived textual fingerprint: name and organization joined by a space.
    ///
    /// This is the unit of similarity comparison. It is recomputed whenever
    /// the store is loaded and never persisted back to the snapshot.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        format!("{} {}", self.name, self.organization)
    }
}
