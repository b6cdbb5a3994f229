//! Book store domain model.
//!
//! # Invariants
//! - A store belongs to exactly one publisher; the back-reference is the
//!   persisted side of that relation.
//! - Customer membership is held in the membership table, never on the
//!   entity itself.

use crate::model::customer::CustomerRecord;
use crate::model::publisher::PublisherId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for book stores.
pub type BookStoreId = Uuid;

/// Stored form of a book store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookStore {
    /// Stable identifier, immutable once persisted.
    pub id: BookStoreId,
    /// Owning publisher back-reference.
    pub publisher_id: PublisherId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
}

impl BookStore {
    /// Creates a fresh, not-yet-persisted store owned by `publisher_id`.
    pub fn new(publisher_id: PublisherId) -> Self {
        Self::with_id(Uuid::new_v4(), publisher_id)
    }

    /// Creates a store shell around a known identifier.
    pub fn with_id(id: BookStoreId, publisher_id: PublisherId) -> Self {
        Self {
            id,
            publisher_id,
            name: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            phone: String::new(),
        }
    }

    /// Copies scalar fields from the wire record onto this entity.
    ///
    /// Identifier, owner back-reference and the customer snapshot stay
    /// untouched; ownership is assigned by the save operation.
    pub fn apply(&mut self, record: &BookStoreRecord) {
        self.name = record.name.clone();
        self.address = record.address.clone();
        self.city = record.city.clone();
        self.state = record.state.clone();
        self.zip = record.zip.clone();
        self.phone = record.phone.clone();
    }
}

/// Wire form of a book store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookStoreRecord {
    /// Identifier, absent on create input.
    pub book_store_id: Option<BookStoreId>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    /// Member customers snapshot. Populated on single-entity retrieval only.
    #[serde(default)]
    pub customers: Vec<CustomerRecord>,
}

impl BookStoreRecord {
    /// Projects a stored book store to its wire form with an empty snapshot.
    pub fn from_entity(book_store: &BookStore) -> Self {
        Self {
            book_store_id: Some(book_store.id),
            name: book_store.name.clone(),
            address: book_store.address.clone(),
            city: book_store.city.clone(),
            state: book_store.state.clone(),
            zip: book_store.zip.clone(),
            phone: book_store.phone.clone(),
            customers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BookStore, BookStoreRecord};
    use uuid::Uuid;

    #[test]
    fn apply_never_reassigns_owner_or_identifier() {
        let owner = Uuid::new_v4();
        let mut store = BookStore::new(owner);
        let original_id = store.id;

        let record = BookStoreRecord {
            book_store_id: Some(Uuid::new_v4()),
            name: "Dockside Books".to_string(),
            address: "12 Pier Rd".to_string(),
            city: "Portsmouth".to_string(),
            state: "NH".to_string(),
            zip: "03801".to_string(),
            phone: "555-0140".to_string(),
            customers: Vec::new(),
        };
        store.apply(&record);

        assert_eq!(store.id, original_id);
        assert_eq!(store.publisher_id, owner);
        assert_eq!(store.name, "Dockside Books");
        assert_eq!(store.zip, "03801");
    }
}
