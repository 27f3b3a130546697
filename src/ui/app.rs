use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::{error, warn};

use crate::db::ContactStore;
use crate::models::{Person, COLUMN_TITLES};

use super::forms::{label_prefix, ConfirmDelete, PersonField, PersonForm};
use super::helpers::{centered_rect, key_hints, surface_error};
use super::screens::{HomeAction, HomeScreen, OverviewScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown on the overview.
const PAGE_STEP: isize = 5;
/// Relative column widths of the overview table.
const COLUMN_WIDTHS: [Constraint; 8] = [
    Constraint::Length(5),
    Constraint::Percentage(13),
    Constraint::Percentage(13),
    Constraint::Percentage(11),
    Constraint::Length(15),
    Constraint::Percentage(22),
    Constraint::Percentage(20),
    Constraint::Length(10),
];

/// The three views of the application. The form owns the person it edits, so
/// nothing has to be stashed globally between screens.
enum Screen {
    Home(HomeScreen),
    Overview(OverviewScreen),
    Form(PersonForm),
}

/// Overlays scoped to the overview.
enum Mode {
    Normal,
    Searching(SearchState),
    ConfirmDelete(ConfirmDelete),
}

/// Last-name query being typed in the search bar.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: ContactStore,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: ContactStore) -> Self {
        Self {
            store,
            screen: Screen::Home(HomeScreen::new()),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Give the store back so the caller can close it on shutdown.
    pub fn into_store(self) -> ContactStore {
        self.store
    }

    /// Close the store after the event loop ends. A failed run keeps its own
    /// error; a close failure on top of it is only logged.
    pub fn shutdown(self, outcome: Result<()>) -> Result<()> {
        let closed = self
            .into_store()
            .close()
            .context("failed to close contact database");
        match (outcome, closed) {
            (Err(err), Err(close_err)) => {
                error!(error = %close_err, "closing after a failed run also failed");
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
            (Ok(()), closed) => closed,
        }
    }

    /// Process one key press. Returns `true` when the application should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        Ok(exit)
    }

    /// Ctrl+L on the form empties every field.
    pub(crate) fn handle_ctrl_l(&mut self) -> Result<()> {
        if let Screen::Form(form) = &mut self.screen {
            form.clear();
            self.set_status("Form cleared.", StatusKind::Info);
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Home(ref mut home) => {
                let mut open_overview = false;
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => *exit = true,
                    KeyCode::Up | KeyCode::BackTab => home.move_selection(-1),
                    KeyCode::Down | KeyCode::Tab => home.move_selection(1),
                    KeyCode::Char('o') | KeyCode::Char('O') => open_overview = true,
                    KeyCode::Enter => match home.current_action() {
                        HomeAction::OpenContacts => open_overview = true,
                        HomeAction::Quit => *exit = true,
                    },
                    _ => {}
                }
                if open_overview {
                    self.clear_status();
                    self.open_overview(None);
                }
                Ok(Mode::Normal)
            }
            Screen::Overview(ref mut overview) => {
                let mut status_to_set: Option<(String, StatusKind)> = None;
                let mut go_home = false;
                let mut refresh = false;
                let mut open_form: Option<PersonForm> = None;
                let mut confirm: Option<ConfirmDelete> = None;

                match code {
                    KeyCode::Char('q') => *exit = true,
                    KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => go_home = true,
                    KeyCode::Up => overview.move_selection(-1),
                    KeyCode::Down => overview.move_selection(1),
                    KeyCode::PageUp => overview.move_selection(-PAGE_STEP),
                    KeyCode::PageDown => overview.move_selection(PAGE_STEP),
                    KeyCode::Home => overview.select_first(),
                    KeyCode::End => overview.select_last(),
                    KeyCode::Char('/') | KeyCode::Char('f') => {
                        let query = overview.filter.clone().unwrap_or_default();
                        return Ok(Mode::Searching(SearchState { query }));
                    }
                    KeyCode::Char('r') | KeyCode::Char('R') => refresh = true,
                    KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                        open_form = Some(PersonForm::new());
                    }
                    KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                        match overview.current_person().cloned() {
                            Some(person) => open_form = Some(PersonForm::from_person(person)),
                            None => {
                                status_to_set = Some((
                                    "No contact selected to edit.".to_string(),
                                    StatusKind::Error,
                                ));
                            }
                        }
                    }
                    KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Char('D') => {
                        match overview.current_person().cloned() {
                            Some(person) => confirm = Some(ConfirmDelete { person }),
                            None => {
                                status_to_set = Some((
                                    "No contact selected to delete.".to_string(),
                                    StatusKind::Error,
                                ));
                            }
                        }
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => {
                        status_to_set = Some(match overview.current_person() {
                            Some(person) => mail_person(person),
                            None => (
                                "No contact selected to email.".to_string(),
                                StatusKind::Error,
                            ),
                        });
                    }
                    _ => {}
                }

                if let Some(confirm) = confirm {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(confirm));
                }

                if go_home {
                    self.clear_status();
                    self.screen = Screen::Home(HomeScreen::new());
                } else if refresh {
                    if self.reload_overview(None, None) {
                        self.set_status("Contact list refreshed.", StatusKind::Info);
                    }
                } else if let Some(form) = open_form {
                    self.clear_status();
                    self.screen = Screen::Form(form);
                } else if let Some((text, kind)) = status_to_set {
                    self.set_status(text, kind);
                }

                Ok(Mode::Normal)
            }
            Screen::Form(ref mut form) => {
                let mut cancel = false;
                let mut save = false;
                match code {
                    KeyCode::Esc => cancel = true,
                    KeyCode::Tab | KeyCode::Down => form.next_field(),
                    KeyCode::BackTab | KeyCode::Up => form.previous_field(),
                    KeyCode::Backspace => form.backspace(),
                    KeyCode::Enter => save = true,
                    KeyCode::Char(ch) => {
                        if form.push_char(ch) {
                            form.error = None;
                        }
                    }
                    _ => {}
                }

                if cancel {
                    self.set_status("Edit cancelled.", StatusKind::Info);
                    self.open_overview(None);
                } else if save {
                    self.save_form()?;
                }
                Ok(Mode::Normal)
            }
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Search cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                self.run_search(&state.query);
                return Ok(Mode::Normal);
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => {}
        }
        Ok(Mode::Searching(state))
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.store.delete(confirm.person.id) {
                    Ok(deleted) => {
                        let filter = self.current_filter();
                        if self.reload_overview(filter, None) {
                            let text = if deleted {
                                format!("Deleted {}.", confirm.person.display_name())
                            } else {
                                format!("{} was already gone.", confirm.person.display_name())
                            };
                            self.set_status(text, StatusKind::Info);
                        }
                        Ok(Mode::Normal)
                    }
                    Err(err) => {
                        self.set_status(format!("Could not delete contact: {err}"), StatusKind::Error);
                        Ok(Mode::ConfirmDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    /// Validate the form and insert or update. On failure the form stays open
    /// with the message; on success the overview is shown again.
    fn save_form(&mut self) -> Result<()> {
        let Screen::Form(form) = &mut self.screen else {
            return Ok(());
        };

        let outcome = form.parse_inputs().and_then(|draft| match &form.editing {
            Some(person) => self
                .store
                .update(person.id, &draft)
                .map(|updated| (person.id, updated, draft.lastname.clone()))
                .context("failed to update contact"),
            None => self
                .store
                .insert(&draft)
                .map(|person| (person.id, true, person.lastname))
                .context("failed to insert contact"),
        });

        match outcome {
            Ok((id, true, lastname)) => {
                let verb = if form.editing.is_some() { "Updated" } else { "Added" };
                let text = format!("{verb} {lastname}.");
                if self.open_overview(Some(id)) {
                    self.set_status(text, StatusKind::Info);
                }
            }
            Ok((id, false, _)) => {
                warn!(id, "edited contact no longer exists");
                self.open_overview(None);
                self.set_status(
                    "That contact no longer exists; nothing was saved.",
                    StatusKind::Error,
                );
            }
            Err(err) => {
                let message = surface_error(&err);
                form.error = Some(message.clone());
                self.set_status(message, StatusKind::Error);
            }
        }
        Ok(())
    }

    fn run_search(&mut self, query: &str) {
        let filter = (!query.is_empty()).then(|| query.to_string());
        if !self.reload_overview(filter, None) {
            return;
        }
        if let Screen::Overview(overview) = &self.screen {
            let text = match &overview.filter {
                Some(name) => format!("{} contact(s) named '{name}'.", overview.persons.len()),
                None => "Showing all contacts.".to_string(),
            };
            self.set_status(text, StatusKind::Info);
        }
    }

    /// Switch to the overview with a full listing.
    fn open_overview(&mut self, focus_id: Option<i64>) -> bool {
        if !matches!(self.screen, Screen::Overview(_)) {
            self.screen = Screen::Overview(OverviewScreen::new(Vec::new(), None));
        }
        self.reload_overview(None, focus_id)
    }

    /// Query the store for the overview. A failure leaves an empty table and
    /// an error in the footer, and returns `false`; the UI keeps running.
    fn reload_overview(&mut self, filter: Option<String>, focus_id: Option<i64>) -> bool {
        let result = match &filter {
            Some(name) => self.store.search(name),
            None => self.store.list(),
        };
        let (persons, loaded) = match result {
            Ok(persons) => (persons, true),
            Err(err) => {
                self.set_status(format!("Could not load contacts: {err}"), StatusKind::Error);
                (Vec::new(), false)
            }
        };
        if let Screen::Overview(overview) = &mut self.screen {
            overview.replace(persons, filter, focus_id);
        }
        loaded
    }

    fn current_filter(&self) -> Option<String> {
        match &self.screen {
            Screen::Overview(overview) => overview.filter.clone(),
            _ => None,
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Home(home) => self.draw_home(frame, content_area, home),
            Screen::Overview(overview) => self.draw_overview(frame, content_area, overview),
            Screen::Form(form) => self.draw_form(frame, content_area, form),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect, home: &HomeScreen) {
        let popup_area = centered_rect(50, 50, area);
        let block = Block::default().borders(Borders::ALL).title("Contact Book");

        let mut lines = vec![
            Line::from(Span::styled(
                "Manage your contacts",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (idx, action) in HomeAction::ALL.iter().enumerate() {
            let style = if idx == home.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if idx == home.selected { "> " } else { "  " };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}", action.label()),
                style,
            )));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_overview(&self, frame: &mut Frame, area: Rect, overview: &OverviewScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let scope = match &overview.filter {
            Some(name) => format!("last name = '{name}'"),
            None => "all contacts".to_string(),
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} contact(s)", overview.persons.len()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  •  {scope}")),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Contacts"));
        frame.render_widget(header, chunks[0]);

        if overview.persons.is_empty() {
            let message = Paragraph::new("No contacts to show. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let header_row = Row::new(COLUMN_TITLES.iter().map(|title| Cell::from(*title)))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);
        let rows = overview
            .persons
            .iter()
            .map(|person| Row::new(person.column_values().into_iter().map(Cell::from)));

        let table = Table::new(rows, COLUMN_WIDTHS)
            .header(header_row)
            .block(Block::default().borders(Borders::ALL))
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(overview.selected));
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &PersonForm) {
        let form_area = centered_rect(70, 70, area);
        frame.render_widget(Clear, form_area);

        let block = Block::default().title(form.title()).borders(Borders::ALL);
        frame.render_widget(block.clone(), form_area);
        let inner = block.inner(form_area);

        let mut lines: Vec<Line> = PersonField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Ctrl+L to clear • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);

        let prefix = label_prefix(form.active).chars().count() as u16;
        let cursor_x = inner.x + prefix + form.active_len() as u16;
        let cursor_y = inner.y + form.active.index() as u16;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search by last name");
        let paragraph = Paragraph::new(Span::raw(format!("Last name: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Last name: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Contact").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete {} permanently?", confirm.person)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match (&self.screen, &self.mode) {
            (_, Mode::Searching(_)) => key_hints(&[
                ("Enter", "Search (empty shows all)"),
                ("Esc", "Cancel"),
            ]),
            (_, Mode::ConfirmDelete(_)) => key_hints(&[("Y", "Delete"), ("N/Esc", "Keep")]),
            (Screen::Home(_), _) => key_hints(&[
                ("↑↓", "Choose"),
                ("Enter", "Select"),
                ("o", "Open contacts"),
                ("q", "Quit"),
            ]),
            (Screen::Overview(_), _) => key_hints(&[
                ("↑↓", "Navigate"),
                ("/", "Search"),
                ("r", "Refresh"),
                ("+", "Add"),
                ("e", "Edit"),
                ("-", "Delete"),
                ("m", "Email"),
                ("Esc", "Home"),
                ("q", "Quit"),
            ]),
            (Screen::Form(_), _) => key_hints(&[
                ("Tab", "Next field"),
                ("Enter", "Save"),
                ("Ctrl+L", "Clear"),
                ("Esc", "Cancel"),
            ]),
        }
    }
}

/// Hand a `mailto:` link for the person to the desktop mail client.
fn mail_person(person: &Person) -> (String, StatusKind) {
    let Some(email) = person.email_address.as_deref().filter(|e| !e.trim().is_empty()) else {
        return (
            format!("{} has no email address.", person.display_name()),
            StatusKind::Error,
        );
    };
    match open_link(format!("mailto:{}", email.trim())) {
        Ok(()) => (format!("Opened mail to {email}."), StatusKind::Info),
        Err(err) => (format!("Failed to open mail client: {err}"), StatusKind::Error),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::PersonDraft;

    fn app() -> App {
        App::new(ContactStore::open_in_memory().unwrap())
    }

    fn draft(lastname: &str, firstname: &str) -> PersonDraft {
        PersonDraft {
            lastname: lastname.into(),
            firstname: firstname.into(),
            nickname: format!("{firstname}ie"),
            ..PersonDraft::default()
        }
    }

    fn press(app: &mut App, codes: &[KeyCode]) {
        for code in codes {
            assert!(!app.handle_key(*code).unwrap(), "unexpected exit on {code:?}");
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, &[KeyCode::Char(ch)]);
        }
    }

    fn overview(app: &App) -> &OverviewScreen {
        match &app.screen {
            Screen::Overview(overview) => overview,
            _ => panic!("expected overview screen"),
        }
    }

    fn status(app: &App) -> (&str, StatusKind) {
        let status = app.status.as_ref().expect("status message");
        (status.text.as_str(), status.kind)
    }

    #[test]
    fn shutdown_keeps_the_run_error() {
        let err = app()
            .shutdown(Err(anyhow::anyhow!("failed to draw frame")))
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to draw frame");

        assert!(app().shutdown(Ok(())).is_ok());
    }

    #[test]
    fn home_quits_and_opens_overview() {
        let mut a = app();
        a.store.insert(&draft("Doe", "John")).unwrap();

        press(&mut a, &[KeyCode::Enter]);
        assert_eq!(overview(&a).persons.len(), 1);

        press(&mut a, &[KeyCode::Esc]);
        assert!(matches!(a.screen, Screen::Home(_)));
        press(&mut a, &[KeyCode::Down]);
        assert!(a.handle_key(KeyCode::Enter).unwrap());
    }

    #[test]
    fn adding_a_contact_through_the_form() {
        let mut a = app();
        press(&mut a, &[KeyCode::Char('o'), KeyCode::Char('+')]);
        assert!(matches!(&a.screen, Screen::Form(form) if form.editing.is_none()));

        type_text(&mut a, "Doe");
        press(&mut a, &[KeyCode::Tab]);
        type_text(&mut a, "John");
        press(&mut a, &[KeyCode::Tab]);
        type_text(&mut a, "Johnny");
        press(&mut a, &[KeyCode::Tab]);
        type_text(&mut a, "1234567890");
        press(&mut a, &[KeyCode::Tab, KeyCode::Tab, KeyCode::Tab]);
        type_text(&mut a, "1990-01-01");
        press(&mut a, &[KeyCode::Enter]);

        let persons = &overview(&a).persons;
        assert_eq!(persons.len(), 1);
        assert_eq!(persons[0].lastname, "Doe");
        assert_eq!(persons[0].phone_number.as_deref(), Some("1234567890"));
        assert_eq!(persons[0].address, None);
        assert_eq!(persons[0].birth_date, NaiveDate::from_ymd_opt(1990, 1, 1));
        assert_eq!(status(&a), ("Added Doe.", StatusKind::Info));
    }

    #[test]
    fn invalid_date_keeps_form_open_with_error() {
        let mut a = app();
        press(&mut a, &[KeyCode::Char('o'), KeyCode::Char('a')]);
        type_text(&mut a, "Doe");
        press(&mut a, &[KeyCode::BackTab]);
        type_text(&mut a, "01/01/1990");
        press(&mut a, &[KeyCode::Enter]);

        match &a.screen {
            Screen::Form(form) => assert_eq!(
                form.error.as_deref(),
                Some("Birth date must look like YYYY-MM-DD.")
            ),
            _ => panic!("form should stay open"),
        }
        assert!(a.store.list().unwrap().is_empty());
    }

    #[test]
    fn unchanged_row_with_empty_nickname_saves_as_is() {
        let mut a = app();
        let legacy = a
            .store
            .insert(&PersonDraft {
                lastname: " Doe".into(),
                firstname: "John".into(),
                ..PersonDraft::default()
            })
            .unwrap();

        press(&mut a, &[KeyCode::Enter, KeyCode::Char('e'), KeyCode::Enter]);

        assert!(matches!(a.screen, Screen::Overview(_)));
        assert_eq!(a.store.list().unwrap(), vec![legacy]);
        assert_eq!(a.store.search(" Doe").unwrap().len(), 1);
    }

    #[test]
    fn editing_updates_the_selected_contact() {
        let mut a = app();
        a.store.insert(&draft("Doe", "John")).unwrap();
        let smith = a.store.insert(&draft("Smith", "Jane")).unwrap();

        press(&mut a, &[KeyCode::Enter, KeyCode::Down, KeyCode::Char('e')]);
        assert!(matches!(&a.screen, Screen::Form(form) if form.editing.as_ref() == Some(&smith)));

        press(&mut a, &[KeyCode::Tab, KeyCode::Backspace, KeyCode::Backspace]);
        type_text(&mut a, "ne");
        press(&mut a, &[KeyCode::Tab]);
        type_text(&mut a, "2");
        press(&mut a, &[KeyCode::Enter]);

        let all = a.store.list().unwrap();
        let updated = all.iter().find(|p| p.id == smith.id).unwrap();
        assert_eq!(updated.firstname, "Jane");
        assert_eq!(updated.nickname, "Janeie2");
        assert_eq!(all.len(), 2);
        assert_eq!(overview(&a).current_person().map(|p| p.id), Some(smith.id));
    }

    #[test]
    fn cancelling_the_form_changes_nothing() {
        let mut a = app();
        let doe = a.store.insert(&draft("Doe", "John")).unwrap();

        press(&mut a, &[KeyCode::Enter, KeyCode::Enter]);
        type_text(&mut a, "xyz");
        press(&mut a, &[KeyCode::Esc]);

        assert_eq!(a.store.list().unwrap(), vec![doe]);
        assert!(matches!(a.screen, Screen::Overview(_)));
    }

    #[test]
    fn ctrl_l_clears_the_form() {
        let mut a = app();
        let doe = a.store.insert(&draft("Doe", "John")).unwrap();
        press(&mut a, &[KeyCode::Enter, KeyCode::Char('e')]);

        a.handle_ctrl_l().unwrap();

        match &a.screen {
            Screen::Form(form) => {
                assert!(form.lastname.is_empty());
                assert_eq!(form.editing.as_ref(), Some(&doe));
            }
            _ => panic!("expected form"),
        }
    }

    #[test]
    fn search_filters_by_exact_last_name_and_empty_restores() {
        let mut a = app();
        a.store.insert(&draft("Doe", "John")).unwrap();
        a.store.insert(&draft("Smith", "Jane")).unwrap();
        a.store.insert(&draft("Doe", "Jane")).unwrap();

        press(&mut a, &[KeyCode::Enter, KeyCode::Char('/')]);
        type_text(&mut a, "Doe");
        press(&mut a, &[KeyCode::Enter]);
        assert_eq!(overview(&a).persons.len(), 2);
        assert_eq!(overview(&a).filter.as_deref(), Some("Doe"));

        press(&mut a, &[KeyCode::Char('/')]);
        type_text(&mut a, "r");
        press(&mut a, &[KeyCode::Enter]);
        assert!(overview(&a).persons.is_empty());

        press(&mut a, &[KeyCode::Char('/')]);
        press(&mut a, &[KeyCode::Backspace; 4]);
        press(&mut a, &[KeyCode::Enter]);
        assert_eq!(overview(&a).persons.len(), 3);
        assert_eq!(overview(&a).filter, None);
    }

    #[test]
    fn refresh_clears_the_filter() {
        let mut a = app();
        a.store.insert(&draft("Doe", "John")).unwrap();
        a.store.insert(&draft("Smith", "Jane")).unwrap();

        press(&mut a, &[KeyCode::Enter, KeyCode::Char('/')]);
        type_text(&mut a, "Smith");
        press(&mut a, &[KeyCode::Enter]);
        assert_eq!(overview(&a).persons.len(), 1);

        press(&mut a, &[KeyCode::Char('r')]);
        assert_eq!(overview(&a).persons.len(), 2);
        assert_eq!(status(&a), ("Contact list refreshed.", StatusKind::Info));
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut a = app();
        let doe = a.store.insert(&draft("Doe", "John")).unwrap();
        let smith = a.store.insert(&draft("Smith", "Jane")).unwrap();

        press(&mut a, &[KeyCode::Enter, KeyCode::Char('-'), KeyCode::Char('n')]);
        assert_eq!(a.store.list().unwrap().len(), 2);

        press(&mut a, &[KeyCode::Char('d'), KeyCode::Char('y')]);
        assert_eq!(a.store.list().unwrap(), vec![smith]);
        assert_eq!(
            status(&a),
            (format!("Deleted {}.", doe.display_name()).as_str(), StatusKind::Info)
        );
    }

    #[test]
    fn actions_without_selection_report_errors() {
        let mut a = app();
        press(&mut a, &[KeyCode::Enter]);

        press(&mut a, &[KeyCode::Char('e')]);
        assert_eq!(status(&a), ("No contact selected to edit.", StatusKind::Error));
        press(&mut a, &[KeyCode::Char('-')]);
        assert_eq!(status(&a), ("No contact selected to delete.", StatusKind::Error));
        assert!(matches!(a.mode, Mode::Normal));
        press(&mut a, &[KeyCode::Char('m')]);
        assert_eq!(status(&a), ("No contact selected to email.", StatusKind::Error));
    }

    #[test]
    fn mail_without_address_is_an_error() {
        let person = draft("Doe", "John").with_id(1);
        let (text, kind) = mail_person(&person);
        assert_eq!(text, "John Doe has no email address.");
        assert_eq!(kind, StatusKind::Error);
    }

    #[test]
    fn storage_failure_shows_empty_table_and_error() {
        let mut a = app();
        a.store.insert(&draft("Doe", "John")).unwrap();
        a.store.connection().execute("DROP TABLE person", []).unwrap();

        press(&mut a, &[KeyCode::Enter]);

        assert!(overview(&a).persons.is_empty());
        let (text, kind) = status(&a);
        assert!(text.starts_with("Could not load contacts"));
        assert_eq!(kind, StatusKind::Error);
    }

    #[test]
    fn draw_renders_every_screen() {
        use ratatui::backend::TestBackend;
        use ratatui::Terminal;

        let mut a = app();
        a.store.insert(&draft("Doe", "John")).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|frame| a.draw(frame)).unwrap();
        press(&mut a, &[KeyCode::Enter]);
        terminal.draw(|frame| a.draw(frame)).unwrap();
        press(&mut a, &[KeyCode::Char('/')]);
        terminal.draw(|frame| a.draw(frame)).unwrap();
        press(&mut a, &[KeyCode::Esc, KeyCode::Char('-')]);
        terminal.draw(|frame| a.draw(frame)).unwrap();
        press(&mut a, &[KeyCode::Esc, KeyCode::Char('e')]);
        terminal.draw(|frame| a.draw(frame)).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Edit Contact"));
    }
}
