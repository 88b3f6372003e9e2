//! Storage Layer - SQLite-backed line cache
//!
//! System of record is a single SQLite file with tables:
//! - line(species, frequency, uncertainty, einstein_coefficient, upper/lower level
//!   energy, statistical weight and quantum numbers, origin, dbsource, date)
//! - partfunc(species, temperature, partfunc, origin, dbsource)
//! - info(version)
//!
//! A `sync_partfunc` trigger removes partition functions whose last line is deleted.

pub mod codec;
pub mod schema;
pub mod sqlite;

pub use sqlite::{is_cache_file, BatchReport, CacheInfo, InsertOutcome, LineCache};
