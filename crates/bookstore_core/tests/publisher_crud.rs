use bookstore_core::db::open_db_in_memory;
use bookstore_core::{
    BookStoreRecord, CatalogService, CatalogServiceError, EntityKind, PublisherRecord,
    SqliteBookStoreRepository, SqliteCustomerRepository, SqlitePublisherRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

type Service<'conn> = CatalogService<
    SqlitePublisherRepository<'conn>,
    SqliteBookStoreRepository<'conn>,
    SqliteCustomerRepository<'conn>,
>;

fn catalog_service(conn: &Connection) -> Service<'_> {
    CatalogService::new(
        SqlitePublisherRepository::try_new(conn).unwrap(),
        SqliteBookStoreRepository::try_new(conn).unwrap(),
        SqliteCustomerRepository::try_new(conn).unwrap(),
    )
}

fn publisher_record(name: &str) -> PublisherRecord {
    PublisherRecord {
        publisher_id: None,
        name: name.to_string(),
        phone: "555-0100".to_string(),
        email: format!("{}@press.test", name.to_lowercase().replace(' ', ".")),
        book_stores: Vec::new(),
    }
}

#[test]
fn save_without_identifier_creates_publisher_with_fresh_id() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);

    let saved = service.save_publisher(&publisher_record("Quill House")).unwrap();

    assert!(saved.publisher_id.is_some());
    assert_eq!(saved.name, "Quill House");
    assert_eq!(saved.phone, "555-0100");
    assert_eq!(saved.email, "quill.house@press.test");
    assert!(saved.book_stores.is_empty());
}

#[test]
fn save_with_identifier_updates_record_in_place() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);

    let created = service.save_publisher(&publisher_record("Old Name")).unwrap();

    let mut update = publisher_record("New Name");
    update.publisher_id = created.publisher_id;
    update.phone = "555-0199".to_string();
    let updated = service.save_publisher(&update).unwrap();

    assert_eq!(updated.publisher_id, created.publisher_id);
    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.phone, "555-0199");
    assert_eq!(service.list_publishers().unwrap().len(), 1);
}

#[test]
fn saving_same_payload_twice_does_not_create_second_record() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);

    let first = service.save_publisher(&publisher_record("Stable Press")).unwrap();
    let mut replay = publisher_record("Stable Press");
    replay.publisher_id = first.publisher_id;
    let second = service.save_publisher(&replay).unwrap();

    assert_eq!(second.publisher_id, first.publisher_id);
    assert_eq!(second.name, first.name);
    assert_eq!(second.phone, first.phone);
    assert_eq!(second.email, first.email);
    assert_eq!(service.list_publishers().unwrap().len(), 1);
}

#[test]
fn save_with_unknown_identifier_fails_and_leaves_store_unmodified() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);

    service.save_publisher(&publisher_record("Existing")).unwrap();

    let mut update = publisher_record("Ghost");
    update.publisher_id = Some(Uuid::new_v4());
    let err = service.save_publisher(&update).unwrap_err();

    assert!(matches!(
        err,
        CatalogServiceError::NotFound {
            kind: EntityKind::Publisher,
            ..
        }
    ));
    let listed = service.list_publishers().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Existing");
}

#[test]
fn get_and_delete_with_unknown_identifier_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);

    let ghost = Uuid::new_v4();
    assert!(matches!(
        service.get_publisher(ghost).unwrap_err(),
        CatalogServiceError::NotFound {
            kind: EntityKind::Publisher,
            id,
        } if id == ghost
    ));
    assert!(matches!(
        service.delete_publisher(ghost).unwrap_err(),
        CatalogServiceError::NotFound {
            kind: EntityKind::Publisher,
            ..
        }
    ));
}

#[test]
fn bulk_listing_strips_nested_stores_while_get_populates_them() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);

    let publisher = service.save_publisher(&publisher_record("Nested Press")).unwrap();
    let publisher_id = publisher.publisher_id.unwrap();

    let store = BookStoreRecord {
        book_store_id: None,
        name: "Corner Shop".to_string(),
        address: "1 Main St".to_string(),
        city: "Salem".to_string(),
        state: "MA".to_string(),
        zip: "01970".to_string(),
        phone: "555-0150".to_string(),
        customers: Vec::new(),
    };
    service.save_book_store(publisher_id, &store).unwrap();

    let listed = service.list_publishers().unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].book_stores.is_empty());

    let detailed = service.get_publisher(publisher_id).unwrap();
    assert_eq!(detailed.book_stores.len(), 1);
    assert_eq!(detailed.book_stores[0].name, "Corner Shop");
}

#[test]
fn delete_removes_publisher_from_subsequent_reads() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);

    let saved = service.save_publisher(&publisher_record("Short Lived")).unwrap();
    let id = saved.publisher_id.unwrap();

    service.delete_publisher(id).unwrap();

    assert!(service.list_publishers().unwrap().is_empty());
    assert!(matches!(
        service.get_publisher(id).unwrap_err(),
        CatalogServiceError::NotFound { .. }
    ));
}
