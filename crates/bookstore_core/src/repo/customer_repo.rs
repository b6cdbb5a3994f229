//! Customer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist customers and their store membership edges.
//! - Keep the customer upsert and the membership link in one transaction.
//!
//! # Invariants
//! - Membership has set semantics: linking an existing member is a no-op
//!   (composite primary key on the membership table).
//! - Both directions of the membership relation are derived from the same
//!   edge rows, so they cannot disagree.

use crate::model::book_store::BookStoreId;
use crate::model::customer::{Customer, CustomerId};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

use crate::repo::{ensure_connection_ready, parse_uuid, RepoResult, TableSpec};

const CUSTOMER_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email
FROM customers";

const REQUIRED_TABLES: &[TableSpec] = &[
    TableSpec {
        table: "customers",
        columns: &["id", "first_name", "last_name", "email", "updated_at"],
    },
    TableSpec {
        table: "book_store_customers",
        columns: &["book_store_id", "customer_id"],
    },
];

/// Repository interface for customer persistence and membership edges.
pub trait CustomerRepository {
    /// Loads one customer by id.
    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    /// Lists the members of one store, ordered by last name.
    fn find_by_book_store(&self, book_store_id: BookStoreId) -> RepoResult<Vec<Customer>>;
    /// Lists the store identifiers one customer is a member of.
    fn book_store_ids(&self, customer_id: CustomerId) -> RepoResult<Vec<BookStoreId>>;
    /// Upserts the customer and links it to the store in one transaction.
    fn save_with_membership(
        &self,
        customer: &Customer,
        book_store_id: BookStoreId,
    ) -> RepoResult<()>;
}

/// SQLite-backed customer repository.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUSTOMER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_customer_row(row)?));
        }
        Ok(None)
    }

    fn find_by_book_store(&self, book_store_id: BookStoreId) -> RepoResult<Vec<Customer>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                c.id AS id,
                c.first_name AS first_name,
                c.last_name AS last_name,
                c.email AS email
             FROM customers c
             INNER JOIN book_store_customers m ON m.customer_id = c.id
             WHERE m.book_store_id = ?1
             ORDER BY c.last_name COLLATE NOCASE ASC,
                      c.first_name COLLATE NOCASE ASC,
                      c.id ASC;",
        )?;
        let mut rows = stmt.query([book_store_id.to_string()])?;
        let mut customers = Vec::new();
        while let Some(row) = rows.next()? {
            customers.push(parse_customer_row(row)?);
        }
        Ok(customers)
    }

    fn book_store_ids(&self, customer_id: CustomerId) -> RepoResult<Vec<BookStoreId>> {
        let mut stmt = self.conn.prepare(
            "SELECT book_store_id
             FROM book_store_customers
             WHERE customer_id = ?1
             ORDER BY book_store_id ASC;",
        )?;
        let mut rows = stmt.query([customer_id.to_string()])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            ids.push(parse_uuid(&value, "book_store_customers.book_store_id")?);
        }
        Ok(ids)
    }

    fn save_with_membership(
        &self,
        customer: &Customer,
        book_store_id: BookStoreId,
    ) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO customers (id, first_name, last_name, email)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                email = excluded.email,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                customer.id.to_string(),
                customer.first_name.as_str(),
                customer.last_name.as_str(),
                customer.email.as_str(),
            ],
        )?;

        tx.execute(
            "INSERT OR IGNORE INTO book_store_customers (book_store_id, customer_id)
             VALUES (?1, ?2);",
            params![book_store_id.to_string(), customer.id.to_string()],
        )?;

        tx.commit()?;
        Ok(())
    }
}

fn parse_customer_row(row: &Row<'_>) -> RepoResult<Customer> {
    let id_text: String = row.get("id")?;
    Ok(Customer {
        id: parse_uuid(&id_text, "customers.id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
    })
}
