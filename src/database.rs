//! Database initialization and table definitions
//!
//! This module handles the setup of the embedded redb database. Records are
//! stored as JSON strings keyed by document id; unique fields get their own
//! index table mapping the field value to the owning id.

use rand::{distr::Alphanumeric, Rng};
use redb::{Database, TableDefinition};
use std::sync::Arc;

use crate::observer::{QueryObserver, TracingObserver};
use crate::password::DEFAULT_BCRYPT_COST;
use crate::repository::{TourRepository, UserRepository};

/// Tour documents
///
/// Key: tour id
/// Value: JSON-serialized `Tour`
pub const TABLE_TOURS: TableDefinition<&str, &str> = TableDefinition::new("tours_v1");

/// Unique index on tour names
///
/// Key: trimmed tour name
/// Value: id of the tour holding that name
pub const TABLE_TOUR_NAMES: TableDefinition<&str, &str> = TableDefinition::new("tour_names_v1");

/// User documents
///
/// Key: user id
/// Value: JSON-serialized `User`
pub const TABLE_USERS: TableDefinition<&str, &str> = TableDefinition::new("users_v1");

/// Unique index on normalized user emails
pub const TABLE_USER_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("user_emails_v1");

/// Length of generated document ids
pub const ID_LENGTH: usize = 12;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub tours: TourRepository,
    pub users: UserRepository,
}

impl AppState {
    /// State with the default bcrypt cost and tracing-based query timing
    pub fn new(db: Database) -> Self {
        Self::with_options(Arc::new(db), DEFAULT_BCRYPT_COST, Arc::new(TracingObserver))
    }

    pub fn with_options(
        db: Arc<Database>,
        bcrypt_cost: u32,
        observer: Arc<dyn QueryObserver>,
    ) -> Self {
        Self {
            tours: TourRepository::new(db.clone(), observer),
            users: UserRepository::new(db, bcrypt_cost),
        }
    }
}

/// Initializes the embedded database and creates required tables
///
/// # Example
///
/// ```no_run
/// # use natours::database::init_db;
/// let db = init_db("data.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> Result<Database, redb::Error> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        write_txn.open_table(TABLE_TOURS)?;
        write_txn.open_table(TABLE_TOUR_NAMES)?;
        write_txn.open_table(TABLE_USERS)?;
        write_txn.open_table(TABLE_USER_EMAILS)?;
    }
    write_txn.commit()?;

    Ok(db)
}

/// Generates a random alphanumeric document id
pub fn generate_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect()
}
