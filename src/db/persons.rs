use rusqlite::{params, Connection, Row};

use crate::db::dates::StoredDate;
use crate::error::{Result, StorageError};
use crate::models::{Person, PersonDraft};

/// Columns selected by every read query, in the order `person_from_row` expects.
const PERSON_COLUMNS: &str = "idperson, lastname, firstname, nickname, phone_number, address, \
                              email_address, birth_date";

fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
    let birth_date: Option<StoredDate> = row.get(7)?;
    Ok(Person {
        id: row.get(0)?,
        lastname: row.get(1)?,
        firstname: row.get(2)?,
        nickname: row.get(3)?,
        phone_number: row.get(4)?,
        address: row.get(5)?,
        email_address: row.get(6)?,
        birth_date: birth_date.map(|stored| stored.0),
    })
}

/// Every person in natural storage order. No ORDER BY on purpose: the table
/// shows rows the way SQLite returns them.
pub fn list_persons(conn: &Connection) -> Result<Vec<Person>> {
    let mut stmt = conn.prepare(&format!("SELECT {PERSON_COLUMNS} FROM person"))?;

    let persons = stmt
        .query_map([], person_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(persons)
}

/// Persons whose last name equals `lastname` exactly (case-sensitive). An
/// empty query means "no filter".
pub fn search_persons(conn: &Connection, lastname: &str) -> Result<Vec<Person>> {
    if lastname.is_empty() {
        return list_persons(conn);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {PERSON_COLUMNS} FROM person WHERE lastname = ?1"
    ))?;

    let persons = stmt
        .query_map([lastname], person_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(persons)
}

/// Insert a new row and echo the hydrated person with its generated id.
pub fn insert_person(conn: &Connection, draft: &PersonDraft) -> Result<Person> {
    conn.execute(
        "INSERT INTO person (lastname, firstname, nickname, phone_number, address, \
         email_address, birth_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            draft.lastname,
            draft.firstname,
            draft.nickname,
            draft.phone_number,
            draft.address,
            draft.email_address,
            draft.birth_date.map(StoredDate),
        ],
    )
    .map_err(StorageError::from_sqlite)?;

    let id = conn.last_insert_rowid();
    Ok(draft.clone().with_id(id))
}

/// Overwrite every mutable column of `id`. Returns whether a row matched; an
/// unknown id is not an error.
pub fn update_person(conn: &Connection, id: i64, draft: &PersonDraft) -> Result<bool> {
    let updated = conn
        .execute(
            "UPDATE person SET lastname = ?1, firstname = ?2, nickname = ?3, \
             phone_number = ?4, address = ?5, email_address = ?6, birth_date = ?7 \
             WHERE idperson = ?8",
            params![
                draft.lastname,
                draft.firstname,
                draft.nickname,
                draft.phone_number,
                draft.address,
                draft.email_address,
                draft.birth_date.map(StoredDate),
                id,
            ],
        )
        .map_err(StorageError::from_sqlite)?;

    Ok(updated > 0)
}

/// Remove the row for `id`. Returns whether anything was deleted.
pub fn delete_person(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM person WHERE idperson = ?1", params![id])
        .map_err(StorageError::from_sqlite)?;

    Ok(deleted > 0)
}
