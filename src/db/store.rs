use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, error, info};

use crate::error::{Result, StorageError};
use crate::models::{Person, PersonDraft};

use super::connection::{open_database, open_in_memory};
use super::persons::{delete_person, insert_person, list_persons, search_persons, update_person};

/// Sole gateway to the `person` table. Constructed once at launch, handed to
/// the UI, and closed explicitly on shutdown. Each operation runs a single
/// statement on the owned connection.
pub struct ContactStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl ContactStore {
    /// Open (or create) the database file at `path` and make sure the schema
    /// exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = open_database(path)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Store backed by a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: open_in_memory()?,
            path: None,
        })
    }

    /// Backing file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn list(&self) -> Result<Vec<Person>> {
        let persons = list_persons(&self.conn).inspect_err(|err| log_failure("list", err))?;
        debug!(count = persons.len(), "listed persons");
        Ok(persons)
    }

    pub fn insert(&self, draft: &PersonDraft) -> Result<Person> {
        let person =
            insert_person(&self.conn, draft).inspect_err(|err| log_failure("insert", err))?;
        info!(id = person.id, "inserted person");
        Ok(person)
    }

    /// Returns `Ok(false)` when no row has this id; that is a silent no-op.
    pub fn update(&self, id: i64, draft: &PersonDraft) -> Result<bool> {
        let updated =
            update_person(&self.conn, id, draft).inspect_err(|err| log_failure("update", err))?;
        if updated {
            info!(id, "updated person");
        } else {
            debug!(id, "update matched no person");
        }
        Ok(updated)
    }

    /// Returns `Ok(false)` when no row has this id; that is a silent no-op.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let deleted =
            delete_person(&self.conn, id).inspect_err(|err| log_failure("delete", err))?;
        if deleted {
            info!(id, "deleted person");
        } else {
            debug!(id, "delete matched no person");
        }
        Ok(deleted)
    }

    /// Exact, case-sensitive match on the last name; `""` lists everything.
    pub fn search(&self, lastname: &str) -> Result<Vec<Person>> {
        let persons =
            search_persons(&self.conn, lastname).inspect_err(|err| log_failure("search", err))?;
        debug!(lastname, count = persons.len(), "searched persons");
        Ok(persons)
    }

    /// Close the connection, reporting anything SQLite complains about.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        self.conn
            .close()
            .map_err(|(_, err)| StorageError::Database(err))?;
        match path {
            Some(path) => info!(path = %path.display(), "closed contact database"),
            None => info!("closed in-memory contact database"),
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn log_failure(operation: &str, err: &StorageError) {
    error!(operation, error = %err, "contact store operation failed");
}
