//! Command-line and environment configuration. Only two knobs exist: where the
//! SQLite file lives and where log files go. Both default to a folder in the
//! user's home directory, except that a `database.db` already sitting in the
//! working directory keeps being used.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".contact-book";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "database.db";
/// Log folder inside the application data directory.
const LOG_DIR_NAME: &str = "logs";

#[derive(Parser, Debug, Default)]
#[command(name = "contact-book", about = "Terminal address book backed by SQLite")]
pub struct Args {
    /// SQLite database file holding the `person` table. Defaults to
    /// ./database.db when that file exists, else ~/.contact-book/database.db.
    #[arg(long, value_name = "PATH", env = "CONTACT_BOOK_DB")]
    pub database: Option<PathBuf>,

    /// Directory for the application log file.
    #[arg(long, value_name = "DIR", env = "CONTACT_BOOK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    /// Explicit flags (or their environment variables) win; anything left
    /// unset falls back to the home data directory.
    pub fn from_args(args: Args) -> Result<Self> {
        Self::resolve(args, Path::new(DB_FILE_NAME))
    }

    /// `working_db` is the relative `database.db` older installs kept in the
    /// working directory; it is preferred over the home default only if it
    /// exists.
    fn resolve(args: Args, working_db: &Path) -> Result<Self> {
        let database_path = match args.database {
            Some(path) => path,
            None if working_db.is_file() => working_db.to_path_buf(),
            None => data_dir()?.join(DB_FILE_NAME),
        };
        let log_dir = match args.log_dir {
            Some(dir) => dir,
            None => data_dir()?.join(LOG_DIR_NAME),
        };
        Ok(Self {
            database_path,
            log_dir,
        })
    }
}

/// Resolve the application folder inside the user's home.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
