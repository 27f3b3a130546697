//! Persistence module split across logical submodules.

mod connection;
mod dates;
mod persons;
mod store;

pub use connection::ensure_schema;
pub use store::ContactStore;
