//! Catalog domain model: publishers, book stores, customers.
//!
//! # Responsibility
//! - Define the stored entity shapes and their wire-facing record shapes.
//! - Own scalar field projection between the two shapes.
//!
//! # Invariants
//! - Every stored entity carries a stable identifier assigned exactly once,
//!   on the create path.
//! - Projection (`apply`/`from_entity`) touches scalar fields only; it never
//!   reads or writes identifiers or relationship collections.

use std::fmt::{Display, Formatter};

pub mod book_store;
pub mod customer;
pub mod publisher;

/// Entity kind tag carried by lookup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Publisher,
    BookStore,
    Customer,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Publisher => write!(f, "publisher"),
            Self::BookStore => write!(f, "book store"),
            Self::Customer => write!(f, "customer"),
        }
    }
}
