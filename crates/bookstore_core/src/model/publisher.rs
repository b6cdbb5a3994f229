//! Publisher domain model.
//!
//! # Responsibility
//! - Define the stored publisher entity and its wire record.
//! - Project scalar fields between the two shapes.
//!
//! # Invariants
//! - `id` is assigned on creation and never changed afterwards, even when a
//!   wire record carries a different identifier value.
//! - The record's `book_stores` collection is an informational snapshot; it
//!   never drives persistence of the nested stores.

use crate::model::book_store::BookStoreRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for publishers.
pub type PublisherId = Uuid;

/// Stored form of a publisher.
///
/// Owns the one-to-many relation to book stores; the owned collection is
/// derived from the stores' back-references, not persisted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publisher {
    /// Stable identifier, immutable once persisted.
    pub id: PublisherId,
    /// Display name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Contact email address.
    pub email: String,
}

impl Publisher {
    /// Creates a fresh, not-yet-persisted publisher with a generated id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a publisher shell around a known identifier.
    pub fn with_id(id: PublisherId) -> Self {
        Self {
            id,
            name: String::new(),
            phone: String::new(),
            email: String::new(),
        }
    }

    /// Copies scalar fields from the wire record onto this entity.
    ///
    /// The identifier and the nested store snapshot are deliberately not
    /// copied.
    pub fn apply(&mut self, record: &PublisherRecord) {
        self.name = record.name.clone();
        self.phone = record.phone.clone();
        self.email = record.email.clone();
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire form of a publisher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherRecord {
    /// Identifier, absent on create input.
    pub publisher_id: Option<PublisherId>,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Owned stores snapshot. Empty in bulk listings, populated on
    /// single-entity retrieval.
    #[serde(default)]
    pub book_stores: Vec<BookStoreRecord>,
}

impl PublisherRecord {
    /// Projects a stored publisher to its wire form with an empty snapshot.
    pub fn from_entity(publisher: &Publisher) -> Self {
        Self {
            publisher_id: Some(publisher.id),
            name: publisher.name.clone(),
            phone: publisher.phone.clone(),
            email: publisher.email.clone(),
            book_stores: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Publisher, PublisherRecord};
    use uuid::Uuid;

    #[test]
    fn apply_copies_scalars_but_keeps_identifier() {
        let mut publisher = Publisher::new();
        let original_id = publisher.id;

        let record = PublisherRecord {
            publisher_id: Some(Uuid::new_v4()),
            name: "Mariner Press".to_string(),
            phone: "555-0101".to_string(),
            email: "contact@marinerpress.test".to_string(),
            book_stores: Vec::new(),
        };
        publisher.apply(&record);

        assert_eq!(publisher.id, original_id);
        assert_eq!(publisher.name, "Mariner Press");
        assert_eq!(publisher.phone, "555-0101");
        assert_eq!(publisher.email, "contact@marinerpress.test");
    }

    #[test]
    fn from_entity_leaves_store_snapshot_empty() {
        let mut publisher = Publisher::new();
        publisher.name = "Harbor House".to_string();

        let record = PublisherRecord::from_entity(&publisher);
        assert_eq!(record.publisher_id, Some(publisher.id));
        assert_eq!(record.name, "Harbor House");
        assert!(record.book_stores.is_empty());
    }
}
