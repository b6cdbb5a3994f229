//! Publisher repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide key-based lookup, save-or-update, delete and list-all for
//!   publishers.
//!
//! # Invariants
//! - `save` is keyed on the identifier: insert when absent, full overwrite
//!   when present.
//! - Deleting a publisher cascades to its stores via foreign keys; the
//!   repository does not model the cascade itself.

use crate::model::publisher::{Publisher, PublisherId};
use crate::model::EntityKind;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult, TableSpec};
use rusqlite::{params, Connection, Row};

const PUBLISHER_SELECT_SQL: &str = "SELECT
    id,
    name,
    phone,
    email
FROM publishers";

const REQUIRED_TABLES: &[TableSpec] = &[TableSpec {
    table: "publishers",
    columns: &["id", "name", "phone", "email", "updated_at"],
}];

/// Repository interface for publisher persistence.
pub trait PublisherRepository {
    /// Inserts the publisher, or fully overwrites the row with the same id.
    fn save(&self, publisher: &Publisher) -> RepoResult<()>;
    /// Loads one publisher by id.
    fn find_by_id(&self, id: PublisherId) -> RepoResult<Option<Publisher>>;
    /// Lists every publisher, ordered by name.
    fn find_all(&self) -> RepoResult<Vec<Publisher>>;
    /// Deletes one publisher by id.
    fn delete(&self, id: PublisherId) -> RepoResult<()>;
}

/// SQLite-backed publisher repository.
pub struct SqlitePublisherRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePublisherRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl PublisherRepository for SqlitePublisherRepository<'_> {
    fn save(&self, publisher: &Publisher) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO publishers (id, name, phone, email)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                phone = excluded.phone,
                email = excluded.email,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                publisher.id.to_string(),
                publisher.name.as_str(),
                publisher.phone.as_str(),
                publisher.email.as_str(),
            ],
        )?;
        Ok(())
    }

    fn find_by_id(&self, id: PublisherId) -> RepoResult<Option<Publisher>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PUBLISHER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_publisher_row(row)?));
        }
        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<Publisher>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PUBLISHER_SELECT_SQL} ORDER BY name COLLATE NOCASE ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut publishers = Vec::new();
        while let Some(row) = rows.next()? {
            publishers.push(parse_publisher_row(row)?);
        }
        Ok(publishers)
    }

    fn delete(&self, id: PublisherId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM publishers WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Publisher,
                id,
            });
        }
        Ok(())
    }
}

fn parse_publisher_row(row: &Row<'_>) -> RepoResult<Publisher> {
    let id_text: String = row.get("id")?;
    Ok(Publisher {
        id: parse_uuid(&id_text, "publishers.id")?,
        name: row.get("name")?,
        phone: row.get("phone")?,
        email: row.get("email")?,
    })
}
