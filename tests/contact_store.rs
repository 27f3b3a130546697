use chrono::NaiveDate;
use contact_book::{ensure_schema, ContactStore, PersonDraft, StorageError};
use rusqlite::Connection;
use tempfile::TempDir;

fn john_doe() -> PersonDraft {
    PersonDraft {
        lastname: "Doe".into(),
        firstname: "John".into(),
        nickname: "Johnny".into(),
        phone_number: Some("1234567890".into()),
        address: Some("1234 Elm Street".into()),
        email_address: Some("doe.john@test.com".into()),
        birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
    }
}

#[test]
fn contacts_survive_a_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("database.db");

    let store = ContactStore::open(&path).unwrap();
    assert_eq!(store.path(), Some(path.as_path()));
    let doe = store.insert(&john_doe()).unwrap();
    store.close().unwrap();

    let reopened = ContactStore::open(&path).unwrap();
    assert_eq!(reopened.list().unwrap(), vec![doe.clone()]);
    assert_eq!(reopened.search("Doe").unwrap(), vec![doe]);
    reopened.close().unwrap();
}

#[test]
fn full_lifecycle_on_a_file_store() {
    let dir = TempDir::new().unwrap();
    let store = ContactStore::open(dir.path().join("database.db")).unwrap();

    let doe = store.insert(&john_doe()).unwrap();
    let smith = store
        .insert(&PersonDraft {
            lastname: "Smith".into(),
            firstname: "Jane".into(),
            nickname: "Janie".into(),
            ..PersonDraft::default()
        })
        .unwrap();
    assert!(smith.id > doe.id);

    let mut renamed = john_doe();
    renamed.lastname = "Asley".into();
    renamed.birth_date = None;
    assert!(store.update(doe.id, &renamed).unwrap());

    assert!(store.search("Doe").unwrap().is_empty());
    let asley = store.search("Asley").unwrap();
    assert_eq!(asley.len(), 1);
    assert_eq!(asley[0].to_draft(), renamed);

    assert!(store.delete(doe.id).unwrap());
    assert!(!store.delete(doe.id).unwrap());
    assert_eq!(store.list().unwrap(), vec![smith]);
}

#[test]
fn existing_files_keep_their_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("database.db");

    {
        let conn = Connection::open(&path).unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO person (lastname, firstname, nickname, birth_date) \
             VALUES ('Brown', 'Jim', 'Jimmy', '1985-06-15 00:00:00.000')",
            [],
        )
        .unwrap();
    }

    let store = ContactStore::open(&path).unwrap();
    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].lastname, "Brown");
    assert_eq!(listed[0].birth_date, NaiveDate::from_ymd_opt(1985, 6, 15));
}

#[test]
fn unopenable_path_is_reported() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"plain file").unwrap();

    let err = ContactStore::open(blocker.join("database.db")).err().unwrap();
    assert!(matches!(err, StorageError::DataDir { .. }));
}
