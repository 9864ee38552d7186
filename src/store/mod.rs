//! Read-only access to the weather-observation dataset.
//!
//! The dataset is an externally provisioned SQLite file with two tables,
//! `station` and `measurement`. Nothing here writes to it: connections are
//! opened with `SQLITE_OPEN_READ_ONLY` and every query is a plain `SELECT`.
//!
//! Callers acquire a connection per unit of work through [`Dataset::connect`]
//! and drop it when done; there is no shared handle.

pub mod measurement;
pub mod station;
pub mod summary;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use measurement::{PrecipitationRecord, StationActivity, TemperatureStats, TobsRecord};
pub use station::StationRecord;
pub use summary::DatasetSummary;

/// Location of the dataset on disk. Cheap to clone into request handlers.
#[derive(Debug, Clone)]
pub struct Dataset {
    path: Arc<PathBuf>,
}

impl Dataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh read-only connection to the dataset.
    pub fn connect(&self) -> Result<Connection> {
        open_db(&self.path)
    }
}

/// Open the SQLite file at `db_path` without write access.
///
/// Fails if the file is missing rather than creating an empty database.
pub fn open_db(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open dataset at {}", db_path.display()))?;

    conn.execute_batch("PRAGMA query_only=ON;")?;

    Ok(conn)
}
