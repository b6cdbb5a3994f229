//! Command-line request surface for the bookstore catalog.
//!
//! # Responsibility
//! - Shape command-line input into the wire records the core consumes.
//! - Render core output as JSON and map core errors to exit codes.
//!
//! # Invariants
//! - No business logic lives here; every decision is delegated to core.
//! - Not-found maps to exit code 2, membership violations to 3, any other
//!   failure to 1.

use bookstore_core::db::open_db;
use bookstore_core::{
    default_log_level, init_logging, BookStoreRecord, CatalogService, CatalogServiceError,
    CustomerRecord, PublisherRecord, SqliteBookStoreRepository, SqliteCustomerRepository,
    SqlitePublisherRepository,
};
use clap::{Args, Parser, Subcommand};
use log::info;
use rusqlite::Connection;
use serde_json::json;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

const EXIT_FAILURE: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;
const EXIT_NOT_MEMBER: u8 = 3;

#[derive(Debug, Parser)]
#[command(
    name = "bookstore",
    about = "Catalog management over a local SQLite store",
    version
)]
struct Cli {
    /// Database file path.
    #[arg(long, default_value = "bookstore.sqlite3")]
    db: PathBuf,
    /// Absolute directory for rolling log files. Logging stays off when
    /// unset.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Log level: trace|debug|info|warn|error.
    #[arg(long)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Publisher operations.
    #[command(subcommand)]
    Publisher(PublisherCommand),
    /// Book store operations, scoped to one publisher.
    #[command(subcommand)]
    Bookstore(BookstoreCommand),
    /// Customer operations, scoped to one book store.
    #[command(subcommand)]
    Customer(CustomerCommand),
}

#[derive(Debug, Subcommand)]
enum PublisherCommand {
    /// Creates one publisher.
    Create(PublisherFields),
    /// Updates one publisher by id.
    Update {
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        fields: PublisherFields,
    },
    /// Lists all publishers without nested detail.
    List,
    /// Gets one publisher with nested stores and members.
    Get {
        #[arg(long)]
        id: Uuid,
    },
    /// Deletes one publisher.
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Debug, Args)]
struct PublisherFields {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    email: String,
}

#[derive(Debug, Subcommand)]
enum BookstoreCommand {
    /// Creates one store under a publisher.
    Create {
        #[arg(long)]
        publisher: Uuid,
        #[command(flatten)]
        fields: BookstoreFields,
    },
    /// Updates one store by id under a publisher.
    Update {
        #[arg(long)]
        publisher: Uuid,
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        fields: BookstoreFields,
    },
    /// Lists one publisher's stores without nested detail.
    List {
        #[arg(long)]
        publisher: Uuid,
    },
    /// Gets one store with its member customers.
    Get {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Debug, Args)]
struct BookstoreFields {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    state: String,
    #[arg(long, default_value = "")]
    zip: String,
    #[arg(long, default_value = "")]
    phone: String,
}

#[derive(Debug, Subcommand)]
enum CustomerCommand {
    /// Adds one customer to a store.
    Add {
        #[arg(long)]
        bookstore: Uuid,
        #[command(flatten)]
        fields: CustomerFields,
    },
    /// Updates one customer by id through a store it belongs to.
    Update {
        #[arg(long)]
        bookstore: Uuid,
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        fields: CustomerFields,
    },
    /// Gets one customer with its store memberships.
    Get {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Debug, Args)]
struct CustomerFields {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long, default_value = "")]
    email: String,
}

#[derive(Debug)]
enum CliError {
    Service(CatalogServiceError),
    Render(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "failed to render response: {err}"),
        }
    }
}

impl From<CatalogServiceError> for CliError {
    fn from(value: CatalogServiceError) -> Self {
        Self::Service(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Render(value)
    }
}

fn exit_code_for(err: &CliError) -> u8 {
    match err {
        CliError::Service(CatalogServiceError::NotFound { .. }) => EXIT_NOT_FOUND,
        CliError::Service(CatalogServiceError::NotMember { .. }) => EXIT_NOT_MEMBER,
        _ => EXIT_FAILURE,
    }
}

type Service<'conn> = CatalogService<
    SqlitePublisherRepository<'conn>,
    SqliteBookStoreRepository<'conn>,
    SqliteCustomerRepository<'conn>,
>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        if let Err(err) = init_logging(&level, &log_dir.to_string_lossy()) {
            eprintln!("{}", json!({ "message": err }));
            return ExitCode::from(EXIT_FAILURE);
        }
    }

    let conn = match open_db(&cli.db) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("{}", json!({ "message": err.to_string() }));
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let service = match build_service(&conn) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("{}", json!({ "message": err.to_string() }));
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match dispatch(&service, cli.command) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", json!({ "message": err.to_string() }));
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn build_service(conn: &Connection) -> Result<Service<'_>, CliError> {
    Ok(CatalogService::new(
        SqlitePublisherRepository::try_new(conn).map_err(CatalogServiceError::from)?,
        SqliteBookStoreRepository::try_new(conn).map_err(CatalogServiceError::from)?,
        SqliteCustomerRepository::try_new(conn).map_err(CatalogServiceError::from)?,
    ))
}

fn dispatch(service: &Service<'_>, command: Command) -> Result<String, CliError> {
    match command {
        Command::Publisher(command) => run_publisher(service, command),
        Command::Bookstore(command) => run_bookstore(service, command),
        Command::Customer(command) => run_customer(service, command),
    }
}

fn run_publisher(service: &Service<'_>, command: PublisherCommand) -> Result<String, CliError> {
    match command {
        PublisherCommand::Create(fields) => {
            info!("event=request module=cli op=publisher_create");
            let saved = service.save_publisher(&publisher_record(None, fields))?;
            render(&saved)
        }
        PublisherCommand::Update { id, fields } => {
            info!("event=request module=cli op=publisher_update id={id}");
            let saved = service.save_publisher(&publisher_record(Some(id), fields))?;
            render(&saved)
        }
        PublisherCommand::List => {
            info!("event=request module=cli op=publisher_list");
            render(&service.list_publishers()?)
        }
        PublisherCommand::Get { id } => {
            info!("event=request module=cli op=publisher_get id={id}");
            render(&service.get_publisher(id)?)
        }
        PublisherCommand::Delete { id } => {
            info!("event=request module=cli op=publisher_delete id={id}");
            service.delete_publisher(id)?;
            Ok(json!({ "message": format!("publisher with id={id} deleted") }).to_string())
        }
    }
}

fn run_bookstore(service: &Service<'_>, command: BookstoreCommand) -> Result<String, CliError> {
    match command {
        BookstoreCommand::Create { publisher, fields } => {
            info!("event=request module=cli op=bookstore_create publisher_id={publisher}");
            let saved = service.save_book_store(publisher, &bookstore_record(None, fields))?;
            render(&saved)
        }
        BookstoreCommand::Update {
            publisher,
            id,
            fields,
        } => {
            info!("event=request module=cli op=bookstore_update id={id}");
            let saved = service.save_book_store(publisher, &bookstore_record(Some(id), fields))?;
            render(&saved)
        }
        BookstoreCommand::List { publisher } => {
            info!("event=request module=cli op=bookstore_list publisher_id={publisher}");
            render(&service.list_book_stores(publisher)?)
        }
        BookstoreCommand::Get { id } => {
            info!("event=request module=cli op=bookstore_get id={id}");
            render(&service.get_book_store(id)?)
        }
    }
}

fn run_customer(service: &Service<'_>, command: CustomerCommand) -> Result<String, CliError> {
    match command {
        CustomerCommand::Add { bookstore, fields } => {
            info!("event=request module=cli op=customer_add book_store_id={bookstore}");
            let saved = service.save_customer(bookstore, &customer_record(None, fields))?;
            render(&saved)
        }
        CustomerCommand::Update {
            bookstore,
            id,
            fields,
        } => {
            info!("event=request module=cli op=customer_update id={id}");
            let saved = service.save_customer(bookstore, &customer_record(Some(id), fields))?;
            render(&saved)
        }
        CustomerCommand::Get { id } => {
            info!("event=request module=cli op=customer_get id={id}");
            render(&service.get_customer(id)?)
        }
    }
}

fn publisher_record(id: Option<Uuid>, fields: PublisherFields) -> PublisherRecord {
    PublisherRecord {
        publisher_id: id,
        name: fields.name,
        phone: fields.phone,
        email: fields.email,
        book_stores: Vec::new(),
    }
}

fn bookstore_record(id: Option<Uuid>, fields: BookstoreFields) -> BookStoreRecord {
    BookStoreRecord {
        book_store_id: id,
        name: fields.name,
        address: fields.address,
        city: fields.city,
        state: fields.state,
        zip: fields.zip,
        phone: fields.phone,
        customers: Vec::new(),
    }
}

fn customer_record(id: Option<Uuid>, fields: CustomerFields) -> CustomerRecord {
    CustomerRecord {
        customer_id: id,
        first_name: fields.first_name,
        last_name: fields.last_name,
        email: fields.email,
        book_stores: Vec::new(),
    }
}

fn render<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
