use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Person, PersonDraft, DATE_FORMAT};

/// Fields of the person form, in focus order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum PersonField {
    #[default]
    Lastname,
    Firstname,
    Nickname,
    Phone,
    Address,
    Email,
    BirthDate,
}

impl PersonField {
    pub(crate) const ALL: [PersonField; 7] = [
        PersonField::Lastname,
        PersonField::Firstname,
        PersonField::Nickname,
        PersonField::Phone,
        PersonField::Address,
        PersonField::Email,
        PersonField::BirthDate,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            PersonField::Lastname => "Last name",
            PersonField::Firstname => "First name",
            PersonField::Nickname => "Nickname",
            PersonField::Phone => "Phone",
            PersonField::Address => "Address",
            PersonField::Email => "Email",
            PersonField::BirthDate => "Birth date",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            PersonField::Lastname | PersonField::Firstname | PersonField::Nickname => "<required>",
            PersonField::BirthDate => "<YYYY-MM-DD>",
            _ => "<optional>",
        }
    }

    /// Row of this field inside the form body.
    pub(crate) fn index(self) -> usize {
        PersonField::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }

    fn offset(self, delta: isize) -> Self {
        let len = PersonField::ALL.len() as isize;
        let next = (self.index() as isize + delta).rem_euclid(len);
        PersonField::ALL[next as usize]
    }
}

/// Edit-screen state. `editing` carries the person chosen on the overview, or
/// `None` when the form creates a new contact.
#[derive(Default, Clone)]
pub(crate) struct PersonForm {
    pub(crate) editing: Option<Person>,
    pub(crate) lastname: String,
    pub(crate) firstname: String,
    pub(crate) nickname: String,
    pub(crate) phone: String,
    pub(crate) address: String,
    pub(crate) email: String,
    pub(crate) birth_date: String,
    pub(crate) active: PersonField,
    pub(crate) error: Option<String>,
}

impl PersonForm {
    /// Blank form for a new contact.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Pre-filled form for updating `person`.
    pub(crate) fn from_person(person: Person) -> Self {
        Self {
            lastname: person.lastname.clone(),
            firstname: person.firstname.clone(),
            nickname: person.nickname.clone(),
            phone: person.phone_number.clone().unwrap_or_default(),
            address: person.address.clone().unwrap_or_default(),
            email: person.email_address.clone().unwrap_or_default(),
            birth_date: person
                .birth_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            editing: Some(person),
            active: PersonField::Lastname,
            error: None,
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        if self.editing.is_some() {
            "Edit Contact"
        } else {
            "New Contact"
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.offset(1);
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.offset(-1);
    }

    fn value(&self, field: PersonField) -> &String {
        match field {
            PersonField::Lastname => &self.lastname,
            PersonField::Firstname => &self.firstname,
            PersonField::Nickname => &self.nickname,
            PersonField::Phone => &self.phone,
            PersonField::Address => &self.address,
            PersonField::Email => &self.email,
            PersonField::BirthDate => &self.birth_date,
        }
    }

    fn value_mut(&mut self, field: PersonField) -> &mut String {
        match field {
            PersonField::Lastname => &mut self.lastname,
            PersonField::Firstname => &mut self.firstname,
            PersonField::Nickname => &mut self.nickname,
            PersonField::Phone => &mut self.phone,
            PersonField::Address => &mut self.address,
            PersonField::Email => &mut self.email,
            PersonField::BirthDate => &mut self.birth_date,
        }
    }

    /// Append a character to the active field. Control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value_mut(self.active).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Empty every field but keep the edit target, like a "Clear" button.
    pub(crate) fn clear(&mut self) {
        for field in PersonField::ALL {
            self.value_mut(field).clear();
        }
        self.active = PersonField::Lastname;
        self.error = None;
    }

    /// Build the draft handed to the store. Required text goes through as
    /// typed (empty and padded values included); the store's NOT NULL columns
    /// are the only rule. Blank optional fields become `None`, and the birth
    /// date must parse.
    pub(crate) fn parse_inputs(&self) -> Result<PersonDraft> {
        let optional = |field: PersonField| -> Option<String> {
            let value = self.value(field);
            (!value.trim().is_empty()).then(|| value.clone())
        };

        let birth_date = match optional(PersonField::BirthDate) {
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                    .map_err(|_| anyhow!("Birth date must look like YYYY-MM-DD."))?,
            ),
            None => None,
        };

        Ok(PersonDraft {
            lastname: self.lastname.clone(),
            firstname: self.firstname.clone(),
            nickname: self.nickname.clone(),
            phone_number: optional(PersonField::Phone),
            address: optional(PersonField::Address),
            email_address: optional(PersonField::Email),
            birth_date,
        })
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: PersonField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            field.placeholder().to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(label_prefix(field)),
            Span::styled(display, style),
        ])
    }

    /// Character count of the active field, for cursor placement.
    pub(crate) fn active_len(&self) -> usize {
        self.value(self.active).chars().count()
    }
}

/// Fixed-width `Label: ` prefix so values line up in a column.
pub(crate) fn label_prefix(field: PersonField) -> String {
    format!("{:<12}", format!("{}:", field.label()))
}

/// State for confirming permanent deletion of a contact.
pub(crate) struct ConfirmDelete {
    pub(crate) person: Person,
}
