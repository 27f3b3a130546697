//! Domain models that mirror the `person` table and get passed throughout the
//! TUI. They stay plain data holders; persistence lives in `db` and rendering
//! in `ui`.

use std::fmt;

use chrono::NaiveDate;

/// Format used whenever a birth date is shown to or typed by the user.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored contact. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: i64,
    pub lastname: String,
    pub firstname: String,
    pub nickname: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub email_address: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// Every mutable field of a [`Person`]; what callers hand to insert/update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonDraft {
    pub lastname: String,
    pub firstname: String,
    pub nickname: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub email_address: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl PersonDraft {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: i64) -> Person {
        Person {
            id,
            lastname: self.lastname,
            firstname: self.firstname,
            nickname: self.nickname,
            phone_number: self.phone_number,
            address: self.address,
            email_address: self.email_address,
            birth_date: self.birth_date,
        }
    }
}

/// Column headers of the overview table, in the order of
/// [`Person::column_values`].
pub const COLUMN_TITLES: [&str; 8] = [
    "Id",
    "Last name",
    "First name",
    "Nickname",
    "Phone",
    "Address",
    "Email",
    "Birth date",
];

impl Person {
    pub fn to_draft(&self) -> PersonDraft {
        PersonDraft {
            lastname: self.lastname.clone(),
            firstname: self.firstname.clone(),
            nickname: self.nickname.clone(),
            phone_number: self.phone_number.clone(),
            address: self.address.clone(),
            email_address: self.email_address.clone(),
            birth_date: self.birth_date,
        }
    }

    /// `Firstname Lastname`, used in status messages and dialogs.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// One display string per table column. Absent values render empty.
    pub fn column_values(&self) -> [String; 8] {
        [
            self.id.to_string(),
            self.lastname.clone(),
            self.firstname.clone(),
            self.nickname.clone(),
            self.phone_number.clone().unwrap_or_default(),
            self.address.clone().unwrap_or_default(),
            self.email_address.clone().unwrap_or_default(),
            self.birth_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        ]
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\" {}", self.firstname, self.nickname, self.lastname)
    }
}
