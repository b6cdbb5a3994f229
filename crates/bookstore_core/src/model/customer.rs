//! Customer domain model.

use crate::model::book_store::BookStoreRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for customers.
pub type CustomerId = Uuid;

/// Stored form of a customer.
///
/// Store membership lives in the membership table; both directions of the
/// relation are derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Stable identifier, immutable once persisted.
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Customer {
    /// Creates a fresh, not-yet-persisted customer with a generated id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a customer shell around a known identifier.
    pub fn with_id(id: CustomerId) -> Self {
        Self {
            id,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
        }
    }

    /// Copies scalar fields from the wire record onto this entity.
    pub fn apply(&mut self, record: &CustomerRecord) {
        self.first_name = record.first_name.clone();
        self.last_name = record.last_name.clone();
        self.email = record.email.clone();
    }
}

impl Default for Customer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire form of a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Identifier, absent on create input.
    pub customer_id: Option<CustomerId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Member stores snapshot, shallow. Populated on single-entity retrieval.
    #[serde(default)]
    pub book_stores: Vec<BookStoreRecord>,
}

impl CustomerRecord {
    /// Projects a stored customer to its wire form with an empty snapshot.
    pub fn from_entity(customer: &Customer) -> Self {
        Self {
            customer_id: Some(customer.id),
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            email: customer.email.clone(),
            book_stores: Vec::new(),
        }
    }
}
