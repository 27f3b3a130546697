//! Ratatui front-end: three screens (home, overview, edit form) driven by a
//! crossterm event loop. All persistence goes through the [`ContactStore`]
//! owned by [`App`].
//!
//! [`ContactStore`]: crate::db::ContactStore

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
