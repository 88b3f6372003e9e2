//! # Linecache - Offline spectroscopic line catalog cache
//!
//! Keeps a local SQLite copy of line records and partition-function tables
//! fetched from remote catalogs (CDMS, JPL, VAMDC, ...), so that searches can
//! be answered offline and reproducibly.
//!
//! Linecache provides:
//! - A fixed schema with a uniqueness constraint per transition and catalog pair
//! - Insert / upsert of lines and partition functions with a benign-conflict policy
//! - A filter-driven search over frequency, species (with `*` wildcards), origin,
//!   source, upper-level energy and Einstein coefficient
//! - Automatic removal of partition functions once no line references them

pub mod line;
pub mod partfunc;
pub mod storage;
pub mod query;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use line::{EnergyLevel, Line};
pub use partfunc::{PartitionFunction, BLANK_PARTFUNC};
pub use query::{SearchFilter, SpeciesFilter};
pub use storage::{is_cache_file, BatchReport, CacheInfo, InsertOutcome, LineCache};
pub use config::CacheConfig;

use std::path::PathBuf;

/// Result type alias for Linecache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Linecache operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cache file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Cache file does not exist: {}", .0.display())]
    StoreNotFound(PathBuf),

    #[error("No partition function found for ({species}, {origin}, {dbsource})")]
    PartitionFunctionNotFound {
        species: String,
        origin: String,
        dbsource: String,
    },

    #[error("Unexpected kind of species filter: {0}")]
    MalformedFilter(String),

    #[error("Blob decode error: {0}")]
    Codec(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
