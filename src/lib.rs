//! Core library surface for the Contact Book TUI application.
//!
//! The binary wires these pieces together: [`Config`] resolves paths,
//! [`logging::init`] starts the file logger, [`ContactStore`] owns the SQLite
//! connection, and [`run_app`] drives the terminal UI until the user quits.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// Command-line arguments and the resolved runtime configuration.
pub use config::{Args, Config};

/// Persistence entry points.
pub use db::{ensure_schema, ContactStore};
pub use error::StorageError;

/// The domain types that other layers manipulate.
pub use models::{Person, PersonDraft};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
