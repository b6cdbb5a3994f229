//! Book store repository contract and SQLite implementation.
//!
//! # Invariants
//! - `save` persists the owner back-reference together with the scalar
//!   fields; the publisher-side collection is always derived from it.
//! - Owner listing is deterministic: `name COLLATE NOCASE ASC, id ASC`.

use crate::model::book_store::{BookStore, BookStoreId};
use crate::model::publisher::PublisherId;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoResult, TableSpec};
use rusqlite::{params, Connection, Row};

const BOOK_STORE_SELECT_SQL: &str = "SELECT
    id,
    publisher_id,
    name,
    address,
    city,
    state,
    zip,
    phone
FROM book_stores";

const REQUIRED_TABLES: &[TableSpec] = &[TableSpec {
    table: "book_stores",
    columns: &[
        "id",
        "publisher_id",
        "name",
        "address",
        "city",
        "state",
        "zip",
        "phone",
        "updated_at",
    ],
}];

/// Repository interface for book store persistence.
pub trait BookStoreRepository {
    /// Inserts the store, or fully overwrites the row with the same id.
    fn save(&self, book_store: &BookStore) -> RepoResult<()>;
    /// Loads one store by id.
    fn find_by_id(&self, id: BookStoreId) -> RepoResult<Option<BookStore>>;
    /// Lists the stores owned by one publisher (the derived inverse of the
    /// ownership back-reference).
    fn find_by_publisher(&self, publisher_id: PublisherId) -> RepoResult<Vec<BookStore>>;
}

/// SQLite-backed book store repository.
pub struct SqliteBookStoreRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookStoreRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl BookStoreRepository for SqliteBookStoreRepository<'_> {
    fn save(&self, book_store: &BookStore) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO book_stores (id, publisher_id, name, address, city, state, zip, phone)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (id) DO UPDATE SET
                publisher_id = excluded.publisher_id,
                name = excluded.name,
                address = excluded.address,
                city = excluded.city,
                state = excluded.state,
                zip = excluded.zip,
                phone = excluded.phone,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                book_store.id.to_string(),
                book_store.publisher_id.to_string(),
                book_store.name.as_str(),
                book_store.address.as_str(),
                book_store.city.as_str(),
                book_store.state.as_str(),
                book_store.zip.as_str(),
                book_store.phone.as_str(),
            ],
        )?;
        Ok(())
    }

    fn find_by_id(&self, id: BookStoreId) -> RepoResult<Option<BookStore>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_STORE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_store_row(row)?));
        }
        Ok(None)
    }

    fn find_by_publisher(&self, publisher_id: PublisherId) -> RepoResult<Vec<BookStore>> {
        let mut stmt = self.conn.prepare(&format!(
            "{BOOK_STORE_SELECT_SQL}
             WHERE publisher_id = ?1
             ORDER BY name COLLATE NOCASE ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([publisher_id.to_string()])?;
        let mut stores = Vec::new();
        while let Some(row) = rows.next()? {
            stores.push(parse_book_store_row(row)?);
        }
        Ok(stores)
    }
}

fn parse_book_store_row(row: &Row<'_>) -> RepoResult<BookStore> {
    let id_text: String = row.get("id")?;
    let publisher_id_text: String = row.get("publisher_id")?;
    Ok(BookStore {
        id: parse_uuid(&id_text, "book_stores.id")?,
        publisher_id: parse_uuid(&publisher_id_text, "book_stores.publisher_id")?,
        name: row.get("name")?,
        address: row.get("address")?,
        city: row.get("city")?,
        state: row.get("state")?,
        zip: row.get("zip")?,
        phone: row.get("phone")?,
    })
}
