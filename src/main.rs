//! Binary entry point that glues the SQLite-backed contact store to the TUI:
//! resolve configuration, start logging, open the database, run the event
//! loop, and close the store on the way out.
use anyhow::Context;
use clap::Parser;
use contact_book::{logging, run_app, App, Args, Config, ContactStore};
use tracing::info;

/// Any failure before the UI starts (unwritable data directory, unreadable
/// database file) is fatal and reported on the terminal.
fn main() -> anyhow::Result<()> {
    let config = Config::from_args(Args::parse())?;
    let _guard = logging::init(&config.log_dir)?;
    info!(database = %config.database_path.display(), "starting contact book");

    let store = ContactStore::open(&config.database_path).with_context(|| {
        format!(
            "failed to open contact database at {}",
            config.database_path.display()
        )
    })?;

    let mut app = App::new(store);
    let result = run_app(&mut app);

    app.shutdown(result)?;
    info!("contact book stopped");
    Ok(())
}
