use bookstore_core::db::open_db_in_memory;
use bookstore_core::{
    BookStoreRecord, CatalogService, CatalogServiceError, CustomerRecord, EntityKind,
    PublisherRecord, SqliteBookStoreRepository, SqliteCustomerRepository,
    SqlitePublisherRepository,
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

fn seed_publisher(service: &Service<'_>) -> Uuid {
    let record = PublisherRecord {
        publisher_id: None,
        name: "Seed Press".to_string(),
        phone: "555-0100".to_string(),
        email: "seed@press.test".to_string(),
        book_stores: Vec::new(),
    };
    service.save_publisher(&record).unwrap().publisher_id.unwrap()
}

fn store_record(name: &str) -> BookStoreRecord {
    BookStoreRecord {
        book_store_id: None,
        name: name.to_string(),
        address: "4 Dock St".to_string(),
        city: "Mystic".to_string(),
        state: "CT".to_string(),
        zip: "06355".to_string(),
        phone: "555-0160".to_string(),
        customers: Vec::new(),
    }
}

fn customer_record(first: &str, last: &str) -> CustomerRecord {
    CustomerRecord {
        customer_id: None,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@mail.test", first.to_lowercase(), last.to_lowercase()),
        book_stores: Vec::new(),
    }
}

fn seed_store(service: &Service<'_>, publisher_id: Uuid, name: &str) -> Uuid {
    service
        .save_book_store(publisher_id, &store_record(name))
        .unwrap()
        .book_store_id
        .unwrap()
}

#[test]
fn save_book_store_requires_existing_publisher() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);

    let err = service
        .save_book_store(Uuid::new_v4(), &store_record("Orphan"))
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::NotFound {
            kind: EntityKind::Publisher,
            ..
        }
    ));
}

#[test]
fn save_book_store_links_ownership_both_ways() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);
    let publisher_id = seed_publisher(&service);

    let saved = service
        .save_book_store(publisher_id, &store_record("Quayside Books"))
        .unwrap();
    let store_id = saved.book_store_id.unwrap();

    let publisher = service.get_publisher(publisher_id).unwrap();
    assert_eq!(publisher.book_stores.len(), 1);
    assert_eq!(publisher.book_stores[0].book_store_id, Some(store_id));

    let store = service.get_book_store(store_id).unwrap();
    assert_eq!(store.name, "Quayside Books");
}

#[test]
fn save_book_store_with_identifier_updates_scalars_in_place() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);
    let publisher_id = seed_publisher(&service);
    let store_id = seed_store(&service, publisher_id, "Before");

    let mut update = store_record("After");
    update.book_store_id = Some(store_id);
    update.zip = "06011".to_string();
    let updated = service.save_book_store(publisher_id, &update).unwrap();

    assert_eq!(updated.book_store_id, Some(store_id));
    assert_eq!(updated.name, "After");
    assert_eq!(updated.zip, "06011");
    assert_eq!(service.list_book_stores(publisher_id).unwrap().len(), 1);
}

#[test]
fn save_book_store_with_unknown_identifier_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);
    let publisher_id = seed_publisher(&service);

    let mut update = store_record("Ghost");
    update.book_store_id = Some(Uuid::new_v4());
    let err = service.save_book_store(publisher_id, &update).unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::NotFound {
            kind: EntityKind::BookStore,
            ..
        }
    ));
}

#[test]
fn save_customer_requires_existing_store() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);

    let err = service
        .save_customer(Uuid::new_v4(), &customer_record("Ada", "Byron"))
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::NotFound {
            kind: EntityKind::BookStore,
            ..
        }
    ));
}

#[test]
fn adding_customer_links_membership_both_ways() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);
    let publisher_id = seed_publisher(&service);
    let store_id = seed_store(&service, publisher_id, "Quayside Books");

    let saved = service
        .save_customer(store_id, &customer_record("Ada", "Byron"))
        .unwrap();
    let customer_id = saved.customer_id.unwrap();
    assert_eq!(saved.book_stores.len(), 1);
    assert_eq!(saved.book_stores[0].book_store_id, Some(store_id));

    // Both sides observable by independent retrieval.
    let store = service.get_book_store(store_id).unwrap();
    assert_eq!(store.customers.len(), 1);
    assert_eq!(store.customers[0].customer_id, Some(customer_id));

    let customer = service.get_customer(customer_id).unwrap();
    assert_eq!(customer.book_stores.len(), 1);
    assert_eq!(customer.book_stores[0].book_store_id, Some(store_id));
}

#[test]
fn relinking_existing_member_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);
    let publisher_id = seed_publisher(&service);
    let store_id = seed_store(&service, publisher_id, "Quayside Books");

    let first = service
        .save_customer(store_id, &customer_record("Ada", "Byron"))
        .unwrap();

    let mut replay = customer_record("Ada", "Byron");
    replay.customer_id = first.customer_id;
    let second = service.save_customer(store_id, &replay).unwrap();

    assert_eq!(second.customer_id, first.customer_id);
    assert_eq!(second.first_name, first.first_name);
    assert_eq!(second.last_name, first.last_name);
    assert_eq!(second.email, first.email);
    assert_eq!(
        service.get_book_store(store_id).unwrap().customers.len(),
        1
    );
}

#[test]
fn customer_lookup_through_foreign_store_is_a_membership_violation() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);
    let publisher_id = seed_publisher(&service);
    let store_a = seed_store(&service, publisher_id, "Store A");
    let store_b = seed_store(&service, publisher_id, "Store B");

    let member = service
        .save_customer(store_a, &customer_record("Ada", "Byron"))
        .unwrap();
    let customer_id = member.customer_id.unwrap();

    let mut through_b = customer_record("Ada", "Byron");
    through_b.customer_id = Some(customer_id);
    let err = service.save_customer(store_b, &through_b).unwrap_err();

    assert!(matches!(
        err,
        CatalogServiceError::NotMember {
            customer_id: found_customer,
            book_store_id: found_store,
        } if found_customer == customer_id && found_store == store_b
    ));

    // The violation leaves both membership collections untouched.
    assert!(service.get_book_store(store_b).unwrap().customers.is_empty());
    assert_eq!(service.get_customer(customer_id).unwrap().book_stores.len(), 1);
}

#[test]
fn customer_with_unknown_identifier_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);
    let publisher_id = seed_publisher(&service);
    let store_id = seed_store(&service, publisher_id, "Quayside Books");

    let mut ghost = customer_record("No", "Body");
    ghost.customer_id = Some(Uuid::new_v4());
    let err = service.save_customer(store_id, &ghost).unwrap_err();
    assert!(matches!(
        err,
        CatalogServiceError::NotFound {
            kind: EntityKind::Customer,
            ..
        }
    ));
}

#[test]
fn customer_member_of_several_stores_lists_them_all() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);
    let publisher_id = seed_publisher(&service);
    let store_a = seed_store(&service, publisher_id, "Store A");
    let store_b = seed_store(&service, publisher_id, "Store B");

    let first = service
        .save_customer(store_a, &customer_record("Grace", "Hopper"))
        .unwrap();
    let customer_id = first.customer_id.unwrap();

    // The save path requires prior membership of the target store, so a
    // second membership can only originate at the edge table.
    conn.execute(
        "INSERT INTO book_store_customers (book_store_id, customer_id)
         VALUES (?1, ?2);",
        rusqlite::params![store_b.to_string(), customer_id.to_string()],
    )
    .unwrap();

    let customer = service.get_customer(customer_id).unwrap();
    let mut linked: Vec<Uuid> = customer
        .book_stores
        .iter()
        .map(|store| store.book_store_id.unwrap())
        .collect();
    linked.sort();
    let mut expected = vec![store_a, store_b];
    expected.sort();
    assert_eq!(linked, expected);

    // Nested member snapshots stay shallow on the customer side.
    assert!(customer.book_stores.iter().all(|store| store.customers.is_empty()));
}

#[test]
fn deep_publisher_retrieval_nests_stores_and_their_members() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);
    let publisher_id = seed_publisher(&service);
    let store_id = seed_store(&service, publisher_id, "Quayside Books");
    service
        .save_customer(store_id, &customer_record("Ada", "Byron"))
        .unwrap();

    let publisher = service.get_publisher(publisher_id).unwrap();
    assert_eq!(publisher.book_stores.len(), 1);
    assert_eq!(publisher.book_stores[0].customers.len(), 1);
    assert_eq!(publisher.book_stores[0].customers[0].first_name, "Ada");
}

#[test]
fn deleting_publisher_cascades_to_store_memberships() {
    let conn = open_db_in_memory().unwrap();
    let service = catalog_service(&conn);
    let publisher_id = seed_publisher(&service);
    let store_id = seed_store(&service, publisher_id, "Quayside Books");
    let customer = service
        .save_customer(store_id, &customer_record("Ada", "Byron"))
        .unwrap();
    let customer_id = customer.customer_id.unwrap();

    service.delete_publisher(publisher_id).unwrap();

    assert!(matches!(
        service.get_book_store(store_id).unwrap_err(),
        CatalogServiceError::NotFound {
            kind: EntityKind::BookStore,
            ..
        }
    ));
    // The customer record survives with its memberships gone.
    let orphaned = service.get_customer(customer_id).unwrap();
    assert!(orphaned.book_stores.is_empty());
}
