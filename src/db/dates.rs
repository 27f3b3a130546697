//! Conversion of the `birth_date` column. New rows are written as ISO text, but
//! older files may hold a date-time string or epoch milliseconds, so reading is
//! lenient.

use chrono::{DateTime, Local, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::models::DATE_FORMAT;

/// Wrapper giving `NaiveDate` the column encoding used by the `person` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StoredDate(pub(crate) NaiveDate);

impl ToSql for StoredDate {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.format(DATE_FORMAT).to_string()))
    }
}

impl FromSql for StoredDate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(bytes) => {
                let text =
                    std::str::from_utf8(bytes).map_err(|err| FromSqlError::Other(err.into()))?;
                parse_text(text).map(StoredDate).ok_or_else(|| {
                    FromSqlError::Other(format!("unrecognized date '{text}'").into())
                })
            }
            ValueRef::Integer(millis) => from_epoch_millis(millis)
                .map(StoredDate)
                .ok_or(FromSqlError::OutOfRange(millis)),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Accept `YYYY-MM-DD` optionally followed by a time part.
fn parse_text(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Some(date);
    }
    let date_part = trimmed.get(..10)?;
    let rest = &trimmed[10..];
    if !rest.starts_with(|c: char| c == ' ' || c == 'T') {
        return None;
    }
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

/// Epoch milliseconds as stored by JDBC-style drivers, read back in the local
/// time zone the value was produced in.
fn from_epoch_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&Local).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rusqlite::Connection;

    fn read(conn: &Connection, sql: &str) -> rusqlite::Result<Option<StoredDate>> {
        conn.query_row(sql, [], |row| row.get(0))
    }

    #[test]
    fn iso_text_round_trips() {
        let conn = Connection::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(1958, 8, 29).unwrap();
        let text: String = conn
            .query_row("SELECT ?1", [StoredDate(date)], |row| row.get(0))
            .unwrap();
        assert_eq!(text, "1958-08-29");
        assert_eq!(read(&conn, "SELECT '1958-08-29'").unwrap(), Some(StoredDate(date)));
    }

    #[test]
    fn date_time_text_keeps_the_date() {
        let conn = Connection::open_in_memory().unwrap();
        let expected = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert_eq!(
            read(&conn, "SELECT '1990-01-01 12:00:00.000'").unwrap(),
            Some(StoredDate(expected))
        );
        assert_eq!(
            read(&conn, "SELECT '1990-01-01T08:30:00'").unwrap(),
            Some(StoredDate(expected))
        );
    }

    #[test]
    fn epoch_millis_are_read_in_local_time() {
        let conn = Connection::open_in_memory().unwrap();
        let expected = NaiveDate::from_ymd_opt(1995, 2, 2).unwrap();
        let local_midnight = Local
            .from_local_datetime(&expected.and_hms_opt(0, 0, 0).unwrap())
            .earliest()
            .unwrap();
        let millis = local_midnight.timestamp_millis();
        let value: Option<StoredDate> = conn
            .query_row("SELECT ?1", [millis], |row| row.get(0))
            .unwrap();
        assert_eq!(value, Some(StoredDate(expected)));
    }

    #[test]
    fn null_is_absent_and_garbage_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read(&conn, "SELECT NULL").unwrap(), None);
        assert!(read(&conn, "SELECT 'next tuesday'").is_err());
        assert!(read(&conn, "SELECT '1990-01-01garbage'").is_err());
    }
}
