//! These structs provide the CLI interface for the salescope CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

use crate::seed::SEED_URL;

/// salescope: a command-line tool for product-sale analytics.
///
/// The purpose of this program is to download a product-sale dataset into a
/// local datastore and answer analytical queries over it: a paginated,
/// searchable listing, monthly sales statistics, a price-range histogram, and
/// a category breakdown. The dataset spans one fixed calendar year, so every
/// month-scoped command takes a month number from 1 to 12.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download the seed dataset and replace the local record set with it.
    ///
    /// This is the first command you should run. It fetches the dataset,
    /// drops records with unparseable sale dates or negative prices, and
    /// swaps the store contents in a single transaction.
    Init(InitArgs),
    /// List records with optional free-text search and pagination.
    Transactions(TransactionsArgs),
    /// Total sales amount, sold count and unsold count for one month.
    Statistics(MonthArgs),
    /// Price-range histogram for one month.
    Histogram(MonthArgs),
    /// Category breakdown for one month.
    Categories(MonthArgs),
    /// All four monthly views in one payload.
    Combined(MonthArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The SQLite file holding the record set. Defaults to
    /// ~/.salescope/records.db
    #[arg(long, env = "SALESCOPE_DB", default_value_t = default_db_path())]
    db: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, db: PathBuf) -> Self {
        Self {
            log_level,
            db: db.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn db(&self) -> &DisplayPath {
        &self.db
    }
}

/// Args for the `salescope init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The URL of the seed dataset, a JSON array of sale records.
    #[arg(long, default_value = SEED_URL)]
    source_url: String,
}

impl InitArgs {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

/// Args for the `salescope transactions` command.
#[derive(Debug, Parser, Clone)]
pub struct TransactionsArgs {
    /// Match records whose title, description or price contains this text
    /// (case-insensitive). Omit to list everything.
    #[arg(long)]
    search: Option<String>,

    /// The 1-based page number.
    #[arg(long, default_value_t = 1)]
    page: u64,

    /// The number of records per page.
    #[arg(long, default_value_t = 10)]
    per_page: u64,
}

impl TransactionsArgs {
    pub fn new(search: Option<String>, page: u64, per_page: u64) -> Self {
        Self {
            search,
            page,
            per_page,
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }
}

/// Args for the month-scoped commands.
///
/// The month stays a raw string here; validation happens in the engine layer
/// so that "0", "13" and "abc" all produce the same validation error whether
/// they come from the CLI or another caller.
#[derive(Debug, Parser, Clone)]
pub struct MonthArgs {
    /// The month number, 1 through 12.
    month: String,
}

impl MonthArgs {
    pub fn new(month: impl Into<String>) -> Self {
        Self {
            month: month.into(),
        }
    }

    pub fn month(&self) -> &str {
        &self.month
    }
}

fn default_db_path() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join(".salescope").join("records.db"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --db or SALESCOPE_DB instead of relying on the default \
                database location. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("records.db")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
