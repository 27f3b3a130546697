use crate::models::Person;

/// Entries shown on the home screen, top to bottom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum HomeAction {
    OpenContacts,
    Quit,
}

impl HomeAction {
    pub(crate) const ALL: [HomeAction; 2] = [HomeAction::OpenContacts, HomeAction::Quit];

    pub(crate) fn label(self) -> &'static str {
        match self {
            HomeAction::OpenContacts => "Open contacts",
            HomeAction::Quit => "Quit",
        }
    }
}

/// Landing screen with its two buttons.
pub(crate) struct HomeScreen {
    pub(crate) selected: usize,
}

impl HomeScreen {
    pub(crate) fn new() -> Self {
        Self { selected: 0 }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = HomeAction::ALL.len() as isize;
        self.selected = (self.selected as isize + offset).rem_euclid(len) as usize;
    }

    pub(crate) fn current_action(&self) -> HomeAction {
        HomeAction::ALL[self.selected]
    }
}

/// Table of contacts as last returned by the store, plus the last-name filter
/// that produced it (if any).
pub(crate) struct OverviewScreen {
    pub(crate) persons: Vec<Person>,
    pub(crate) filter: Option<String>,
    pub(crate) selected: usize,
}

impl OverviewScreen {
    pub(crate) fn new(persons: Vec<Person>, filter: Option<String>) -> Self {
        let mut screen = Self {
            persons,
            filter,
            selected: 0,
        };
        screen.ensure_in_bounds();
        screen
    }

    /// Swap in fresh rows, keeping the cursor on `focus_id` when it is still
    /// present.
    pub(crate) fn replace(
        &mut self,
        persons: Vec<Person>,
        filter: Option<String>,
        focus_id: Option<i64>,
    ) {
        self.persons = persons;
        self.filter = filter;
        if let Some(id) = focus_id {
            if let Some(idx) = self.persons.iter().position(|p| p.id == id) {
                self.selected = idx;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.persons.is_empty() {
            return;
        }
        let len = self.persons.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.persons.is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.persons.is_empty() {
            self.selected = self.persons.len() - 1;
        }
    }

    pub(crate) fn current_person(&self) -> Option<&Person> {
        self.persons.get(self.selected)
    }

    fn ensure_in_bounds(&mut self) {
        if self.persons.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.persons.len() {
            self.selected = self.persons.len() - 1;
        }
    }
}
