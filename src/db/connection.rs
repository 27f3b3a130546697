use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, StorageError};

/// Column layout of the `person` table. Names, types and nullability must stay
/// exactly as they are so existing database files keep loading.
const CREATE_PERSON_TABLE: &str = "CREATE TABLE IF NOT EXISTS person (
    idperson INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    lastname VARCHAR(45) NOT NULL,
    firstname VARCHAR(45) NOT NULL,
    nickname VARCHAR(45) NOT NULL,
    phone_number VARCHAR(15) NULL,
    address VARCHAR(200) NULL,
    email_address VARCHAR(150) NULL,
    birth_date DATE NULL
)";

/// Create the `person` table when it is missing. Safe to run on every start.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_PERSON_TABLE, [])
        .map_err(StorageError::from_sqlite)?;
    debug!("person table ready");
    Ok(())
}

/// Make sure the parent directory exists, open the SQLite file and run the
/// schema initializer.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::DataDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    info!(path = %path.display(), "opened contact database");
    Ok(conn)
}

/// Private in-memory database with the schema applied.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}
