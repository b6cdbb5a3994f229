//! Catalog use-case service.
//!
//! # Responsibility
//! - Resolve save targets: load by identifier or create fresh entities.
//! - Project scalar fields between wire records and stored entities.
//! - Maintain the publisher/store ownership and store/customer membership
//!   relations on every write.
//!
//! # Invariants
//! - A present identifier must resolve to a stored record; absence is a
//!   `NotFound` error, never silently ignored.
//! - A customer resolved through a store must already be a member of that
//!   store.
//! - Bulk listings return shallow records; single-entity retrieval populates
//!   nested collections.
//! - Each write maps to exactly one store commit.

use crate::model::book_store::{BookStore, BookStoreId, BookStoreRecord};
use crate::model::customer::{Customer, CustomerId, CustomerRecord};
use crate::model::publisher::{Publisher, PublisherId, PublisherRecord};
use crate::model::EntityKind;
use crate::repo::book_store_repo::BookStoreRepository;
use crate::repo::customer_repo::CustomerRepository;
use crate::repo::publisher_repo::PublisherRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum CatalogServiceError {
    /// Lookup by identifier yielded no stored record.
    NotFound { kind: EntityKind, id: Uuid },
    /// Customer resolved through a store it is not a member of.
    NotMember {
        customer_id: CustomerId,
        book_store_id: BookStoreId,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    Inconsistent(&'static str),
}

impl Display for CatalogServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} with id={id} was not found"),
            Self::NotMember {
                customer_id,
                book_store_id,
            } => write!(
                f,
                "customer with id={customer_id} is not a member of book store with id={book_store_id}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Inconsistent(details) => write!(f, "inconsistent catalog state: {details}"),
        }
    }
}

impl Error for CatalogServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CatalogServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, CatalogServiceError>;

/// Catalog service facade over the three entity repositories.
///
/// Repositories are injected at construction; the service holds no other
/// state.
pub struct CatalogService<P, B, C> {
    publishers: P,
    book_stores: B,
    customers: C,
}

impl<P, B, C> CatalogService<P, B, C>
where
    P: PublisherRepository,
    B: BookStoreRepository,
    C: CustomerRepository,
{
    /// Creates a service using the provided repository implementations.
    pub fn new(publishers: P, book_stores: B, customers: C) -> Self {
        Self {
            publishers,
            book_stores,
            customers,
        }
    }

    /// Creates or updates one publisher from its wire record.
    ///
    /// # Contract
    /// - Record without identifier: creates a new publisher with a fresh id.
    /// - Record with identifier: overwrites that publisher's scalar fields.
    /// - Returns the saved publisher with its store collection populated.
    pub fn save_publisher(&self, record: &PublisherRecord) -> ServiceResult<PublisherRecord> {
        let mut publisher = self.resolve_publisher(record.publisher_id)?;
        publisher.apply(record);
        self.publishers.save(&publisher)?;
        info!(
            "event=publisher_save module=service status=ok id={}",
            publisher.id
        );

        let saved = self
            .publishers
            .find_by_id(publisher.id)?
            .ok_or(CatalogServiceError::Inconsistent(
                "publisher missing after save",
            ))?;
        self.publisher_detail(&saved)
    }

    /// Lists every publisher with an empty store snapshot.
    ///
    /// Nested collections are populated only on single-entity retrieval.
    pub fn list_publishers(&self) -> ServiceResult<Vec<PublisherRecord>> {
        let publishers = self.publishers.find_all()?;
        Ok(publishers.iter().map(PublisherRecord::from_entity).collect())
    }

    /// Gets one publisher with stores and their members populated.
    pub fn get_publisher(&self, id: PublisherId) -> ServiceResult<PublisherRecord> {
        let publisher = self.require_publisher(id)?;
        self.publisher_detail(&publisher)
    }

    /// Deletes one publisher by id.
    ///
    /// Cascading removal of its stores and their membership edges is the
    /// store's referential behavior, not modeled here.
    pub fn delete_publisher(&self, id: PublisherId) -> ServiceResult<()> {
        let publisher = self.require_publisher(id)?;
        self.publishers.delete(publisher.id)?;
        info!(
            "event=publisher_delete module=service status=ok id={}",
            publisher.id
        );
        Ok(())
    }

    /// Creates or updates one book store under the given publisher.
    ///
    /// # Contract
    /// - The owning publisher must exist.
    /// - Record without identifier: creates a new store owned by the
    ///   publisher.
    /// - Record with identifier: overwrites that store's scalar fields and
    ///   re-assigns its owner back-reference to the given publisher.
    pub fn save_book_store(
        &self,
        publisher_id: PublisherId,
        record: &BookStoreRecord,
    ) -> ServiceResult<BookStoreRecord> {
        let publisher = self.require_publisher(publisher_id)?;
        let mut book_store = self.resolve_book_store(record.book_store_id, &publisher)?;
        book_store.apply(record);
        book_store.publisher_id = publisher.id;
        self.book_stores.save(&book_store)?;
        info!(
            "event=book_store_save module=service status=ok id={} publisher_id={}",
            book_store.id, publisher.id
        );

        let saved = self
            .book_stores
            .find_by_id(book_store.id)?
            .ok_or(CatalogServiceError::Inconsistent(
                "book store missing after save",
            ))?;
        self.book_store_detail(&saved)
    }

    /// Gets one book store with its member customers populated.
    pub fn get_book_store(&self, id: BookStoreId) -> ServiceResult<BookStoreRecord> {
        let book_store = self.require_book_store(id)?;
        self.book_store_detail(&book_store)
    }

    /// Lists one publisher's stores with empty member snapshots.
    pub fn list_book_stores(&self, publisher_id: PublisherId) -> ServiceResult<Vec<BookStoreRecord>> {
        let publisher = self.require_publisher(publisher_id)?;
        let stores = self.book_stores.find_by_publisher(publisher.id)?;
        Ok(stores.iter().map(BookStoreRecord::from_entity).collect())
    }

    /// Creates or updates one customer as a member of the given store.
    ///
    /// # Contract
    /// - The store must exist.
    /// - Record with identifier: the customer must already be a member of
    ///   the store.
    /// - The customer upsert and the membership edge are committed together;
    ///   re-linking an existing member is a no-op.
    pub fn save_customer(
        &self,
        book_store_id: BookStoreId,
        record: &CustomerRecord,
    ) -> ServiceResult<CustomerRecord> {
        let book_store = self.require_book_store(book_store_id)?;
        let mut customer = self.resolve_customer(record.customer_id, book_store.id)?;
        customer.apply(record);
        self.customers.save_with_membership(&customer, book_store.id)?;
        info!(
            "event=customer_save module=service status=ok id={} book_store_id={}",
            customer.id, book_store.id
        );

        let saved = self
            .customers
            .find_by_id(customer.id)?
            .ok_or(CatalogServiceError::Inconsistent(
                "customer missing after save",
            ))?;
        self.customer_detail(&saved)
    }

    /// Gets one customer with its store memberships populated (shallow).
    pub fn get_customer(&self, id: CustomerId) -> ServiceResult<CustomerRecord> {
        let customer = self
            .customers
            .find_by_id(id)?
            .ok_or(CatalogServiceError::NotFound {
                kind: EntityKind::Customer,
                id,
            })?;
        self.customer_detail(&customer)
    }

    /// Loads the publisher or creates a fresh unpersisted one.
    fn resolve_publisher(&self, id: Option<PublisherId>) -> ServiceResult<Publisher> {
        match id {
            None => Ok(Publisher::new()),
            Some(id) => self.require_publisher(id),
        }
    }

    fn require_publisher(&self, id: PublisherId) -> ServiceResult<Publisher> {
        self.publishers
            .find_by_id(id)?
            .ok_or(CatalogServiceError::NotFound {
                kind: EntityKind::Publisher,
                id,
            })
    }

    /// Loads the store or creates a fresh unpersisted one owned by
    /// `publisher`.
    fn resolve_book_store(
        &self,
        id: Option<BookStoreId>,
        publisher: &Publisher,
    ) -> ServiceResult<BookStore> {
        match id {
            None => Ok(BookStore::new(publisher.id)),
            Some(id) => self.require_book_store(id),
        }
    }

    fn require_book_store(&self, id: BookStoreId) -> ServiceResult<BookStore> {
        self.book_stores
            .find_by_id(id)?
            .ok_or(CatalogServiceError::NotFound {
                kind: EntityKind::BookStore,
                id,
            })
    }

    /// Loads the customer or creates a fresh unpersisted one.
    ///
    /// A customer looked up through a store context must already be a member
    /// of that store; the check scans the customer's store identifiers.
    fn resolve_customer(
        &self,
        id: Option<CustomerId>,
        book_store_id: BookStoreId,
    ) -> ServiceResult<Customer> {
        let Some(id) = id else {
            return Ok(Customer::new());
        };

        let customer = self
            .customers
            .find_by_id(id)?
            .ok_or(CatalogServiceError::NotFound {
                kind: EntityKind::Customer,
                id,
            })?;

        let member_of = self.customers.book_store_ids(customer.id)?;
        if !member_of.contains(&book_store_id) {
            return Err(CatalogServiceError::NotMember {
                customer_id: customer.id,
                book_store_id,
            });
        }

        Ok(customer)
    }

    /// Assembles the deep wire record for one publisher.
    fn publisher_detail(&self, publisher: &Publisher) -> ServiceResult<PublisherRecord> {
        let mut record = PublisherRecord::from_entity(publisher);
        for book_store in self.book_stores.find_by_publisher(publisher.id)? {
            record.book_stores.push(self.book_store_detail(&book_store)?);
        }
        Ok(record)
    }

    /// Assembles the wire record for one store with its members populated.
    fn book_store_detail(&self, book_store: &BookStore) -> ServiceResult<BookStoreRecord> {
        let mut record = BookStoreRecord::from_entity(book_store);
        for customer in self.customers.find_by_book_store(book_store.id)? {
            record.customers.push(CustomerRecord::from_entity(&customer));
        }
        Ok(record)
    }

    /// Assembles the wire record for one customer with shallow store
    /// records for each membership.
    fn customer_detail(&self, customer: &Customer) -> ServiceResult<CustomerRecord> {
        let mut record = CustomerRecord::from_entity(customer);
        for book_store_id in self.customers.book_store_ids(customer.id)? {
            let book_store = self
                .book_stores
                .find_by_id(book_store_id)?
                .ok_or(CatalogServiceError::Inconsistent(
                    "membership edge points at a missing book store",
                ))?;
            record.book_stores.push(BookStoreRecord::from_entity(&book_store));
        }
        Ok(record)
    }
}
