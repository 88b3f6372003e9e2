//! SQLite storage implementation

use std::path::{Path, PathBuf};
use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OpenFlags, OptionalExtension};
use crate::{Result, Error};
use crate::config::CacheConfig;
use crate::line::{EnergyLevel, Line};
use crate::partfunc::PartitionFunction;
use crate::query::SearchFilter;
use super::codec;
use super::schema::{self, LineColumn};

/// Outcome of a single insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was inserted, or updated in place by an upsert
    Written,
    /// A plain insert hit an existing record and was dropped
    Ignored,
}

/// Counts for a batch insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub written: usize,
    pub ignored: usize,
}

impl BatchReport {
    fn record(&mut self, outcome: InsertOutcome) {
        match outcome {
            InsertOutcome::Written => self.written += 1,
            InsertOutcome::Ignored => self.ignored += 1,
        }
    }
}

/// SQLite-backed line cache.
///
/// Holds only the file path: every operation opens its own connection,
/// commits, and drops it.
#[derive(Debug, Clone)]
pub struct LineCache {
    path: PathBuf,
    config: CacheConfig,
}

impl LineCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_config(path, CacheConfig::default())
    }

    pub fn with_config(path: impl Into<PathBuf>, config: CacheConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Open a connection to the cache file.
    ///
    /// With `create_if_missing == false` the file must already exist;
    /// SQLite would otherwise silently create an empty database.
    pub fn connect(&self, create_if_missing: bool) -> Result<Connection> {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        } else if !self.path.is_file() {
            return Err(Error::StoreNotFound(self.path.clone()));
        }
        Ok(Connection::open_with_flags(&self.path, flags)?)
    }

    // ========== Schema Operations ==========

    /// Create an empty cache recording `version`.
    pub fn create(&self, version: &str, overwrite: bool) -> Result<()> {
        if self.path.exists() {
            if !overwrite {
                return Err(Error::AlreadyExists(self.path.clone()));
            }
            tracing::debug!("Removing existing cache {}", self.path.display());
            std::fs::remove_file(&self.path)?;
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut conn = self.connect(true)?;
        let tx = conn.transaction()?;
        for stmt in schema::all_schema_statements() {
            tx.execute(&stmt, [])?;
        }
        tx.execute("INSERT INTO info (version) VALUES (?1)", [version])?;
        tx.commit()?;

        tracing::info!("Created line cache {} (version {})", self.path.display(), version);
        Ok(())
    }

    /// Summary of the cache contents
    pub fn info(&self) -> Result<CacheInfo> {
        let conn = self.connect(false)?;
        let version: String = conn.query_row("SELECT version FROM info", [], |row| row.get(0))?;
        let (min_frequency, max_frequency, lines): (Option<f64>, Option<f64>, i64) = conn.query_row(
            "SELECT MIN(frequency), MAX(frequency), COUNT(*) FROM line",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        let partition_functions: i64 =
            conn.query_row("SELECT COUNT(*) FROM partfunc", [], |row| row.get(0))?;

        Ok(CacheInfo {
            version,
            min_frequency,
            max_frequency,
            lines: lines as usize,
            partition_functions: partition_functions as usize,
        })
    }

    // ========== Line Operations ==========

    /// Insert a line, or upsert it when `update` is set.
    ///
    /// A plain insert of an already cached transition is not an error: the
    /// existing row is kept and [`InsertOutcome::Ignored`] is returned.
    pub fn add_line(&self, line: &Line, update: bool) -> Result<InsertOutcome> {
        let conn = self.connect(false)?;
        let sql = line_statement(update);
        let mut stmt = conn.prepare(&sql)?;
        self.execute_line(&mut stmt, line)
    }

    /// Insert many lines in one transaction; conflicts skip single records.
    pub fn add_lines(&self, lines: &[Line], update: bool) -> Result<BatchReport> {
        let mut conn = self.connect(false)?;
        let tx = conn.transaction()?;
        let mut report = BatchReport::default();
        {
            let sql = line_statement(update);
            let mut stmt = tx.prepare(&sql)?;
            for line in lines {
                report.record(self.execute_line(&mut stmt, line)?);
            }
        }
        tx.commit()?;

        tracing::info!(
            "Stored {} lines ({} already cached) in {}",
            report.written,
            report.ignored,
            self.path.display()
        );
        Ok(report)
    }

    fn execute_line(&self, stmt: &mut rusqlite::Statement<'_>, line: &Line) -> Result<InsertOutcome> {
        let date = if self.config.stamps_date(line) {
            now_iso8601()
        } else {
            line.date.clone()
        };
        let values = LineColumn::ALL.iter().map(|c| c.value_of(line, &date));

        match stmt.execute(params_from_iter(values)) {
            Ok(_) => Ok(InsertOutcome::Written),
            Err(e) if is_conflict(&e) => {
                tracing::debug!(
                    "line ({}, {}, {} -- {}) already present, not inserting",
                    line.species,
                    line.dbsource,
                    line.upper_level.quantum_numbers,
                    line.lower_level.quantum_numbers
                );
                Ok(InsertOutcome::Ignored)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete lines by identity. Partition functions left without any line
    /// are dropped by the `sync_partfunc` trigger in the same transaction.
    pub fn remove(&self, lines: &[Line]) -> Result<usize> {
        let mut conn = self.connect(false)?;
        let tx = conn.transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare(schema::DELETE_LINE)?;
            for line in lines {
                removed += stmt.execute(params![
                    line.species,
                    line.origin,
                    line.stored_source(),
                    line.upper_level.quantum_numbers,
                    line.lower_level.quantum_numbers,
                ])?;
            }
        }
        tx.commit()?;

        tracing::debug!("Removed {} lines from {}", removed, self.path.display());
        Ok(removed)
    }

    /// Search lines matching `filter`, in storage order.
    pub fn search(&self, filter: &SearchFilter) -> Result<Vec<Line>> {
        let conn = self.connect(false)?;
        let predicate = filter.to_predicate();
        let sql = format!(
            "SELECT {} FROM line WHERE {}",
            schema::line_column_list(),
            predicate.where_clause()
        );
        tracing::debug!("search: {} {:?}", sql, predicate.params);

        let mut stmt = conn.prepare(&sql)?;
        let lines = stmt
            .query_map(params_from_iter(predicate.params.iter()), |row| self.row_to_line(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(lines)
    }

    /// Helper to convert a row to a Line
    fn row_to_line(&self, row: &rusqlite::Row) -> rusqlite::Result<Line> {
        let dbsource: String = row.get(LineColumn::DbSource.name())?;

        Ok(Line {
            species: row.get(LineColumn::Species.name())?,
            frequency: row.get(LineColumn::Frequency.name())?,
            err_frequency: row.get(LineColumn::Uncertainty.name())?,
            einstein_coefficient: row.get(LineColumn::EinsteinCoefficient.name())?,
            upper_level: EnergyLevel {
                energy: row.get(LineColumn::UpperLevelEnergy.name())?,
                statistical_weight: row.get(LineColumn::UpperLevelStatisticalWeight.name())?,
                quantum_numbers: row.get(LineColumn::UpperLevelQuantumNumbers.name())?,
            },
            lower_level: EnergyLevel {
                energy: row.get(LineColumn::LowerLevelEnergy.name())?,
                statistical_weight: row.get(LineColumn::LowerLevelStatisticalWeight.name())?,
                quantum_numbers: row.get(LineColumn::LowerLevelQuantumNumbers.name())?,
            },
            origin: row.get(LineColumn::Origin.name())?,
            previous_source: Some(dbsource.clone()),
            dbsource,
            date: row.get(LineColumn::Date.name())?,
        })
    }

    // ========== Partition Function Operations ==========

    /// Insert a partition function, or upsert it when `update` is set.
    pub fn add_partfunc(&self, pf: &PartitionFunction, update: bool) -> Result<InsertOutcome> {
        let conn = self.connect(false)?;
        let mut stmt = conn.prepare(partfunc_statement(update))?;
        execute_partfunc(&mut stmt, pf)
    }

    /// Insert many partition functions in one transaction.
    pub fn add_partfuncs(&self, pfs: &[PartitionFunction], update: bool) -> Result<BatchReport> {
        let mut conn = self.connect(false)?;
        let tx = conn.transaction()?;
        let mut report = BatchReport::default();
        {
            let mut stmt = tx.prepare(partfunc_statement(update))?;
            for pf in pfs {
                report.record(execute_partfunc(&mut stmt, pf)?);
            }
        }
        tx.commit()?;

        tracing::info!(
            "Stored {} partition functions ({} already cached)",
            report.written,
            report.ignored
        );
        Ok(report)
    }

    /// Get the partition function of a species.
    ///
    /// A cached blank table is reported exactly like a missing one.
    pub fn partition_function(&self, species: &str, origin: &str, dbsource: &str) -> Result<PartitionFunction> {
        let conn = self.connect(false)?;
        let blobs: Option<(Vec<u8>, Vec<u8>)> = conn
            .query_row(schema::SELECT_PARTFUNC, params![species, origin, dbsource], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .optional()?;

        let not_found = || Error::PartitionFunctionNotFound {
            species: species.to_string(),
            origin: origin.to_string(),
            dbsource: dbsource.to_string(),
        };

        let (temperature, values) = blobs.ok_or_else(not_found)?;
        let pf = PartitionFunction::new(
            species,
            codec::decode(&temperature)?,
            codec::decode(&values)?,
            origin,
            dbsource,
        );

        if pf.is_blank() {
            return Err(not_found());
        }
        Ok(pf)
    }
}

fn line_statement(update: bool) -> String {
    if update {
        schema::upsert_line()
    } else {
        schema::insert_line()
    }
}

fn partfunc_statement(update: bool) -> &'static str {
    if update {
        schema::UPSERT_PARTFUNC
    } else {
        schema::INSERT_PARTFUNC
    }
}

fn execute_partfunc(stmt: &mut rusqlite::Statement<'_>, pf: &PartitionFunction) -> Result<InsertOutcome> {
    let result = stmt.execute(params![
        pf.species,
        codec::encode(&pf.temperature),
        codec::encode(&pf.values),
        pf.origin,
        pf.dbsource,
    ]);

    match result {
        Ok(_) => Ok(InsertOutcome::Written),
        Err(e) if is_conflict(&e) => {
            tracing::debug!(
                "partition function ({}, {}, {}) already present, not inserting",
                pf.species,
                pf.origin,
                pf.dbsource
            );
            Ok(InsertOutcome::Ignored)
        }
        Err(e) => Err(e.into()),
    }
}

fn is_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn now_iso8601() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Check whether `path` holds a line cache.
///
/// Opens read-only, so a missing file is never created; any failure means
/// "no".
pub fn is_cache_file(path: &Path) -> bool {
    let Ok(conn) = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY) else {
        return false;
    };
    conn.query_row("SELECT version FROM info", [], |row| row.get::<_, Option<String>>(0))
        .optional()
        .is_ok()
}

/// Cache summary
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CacheInfo {
    pub version: String,
    pub min_frequency: Option<f64>,
    pub max_frequency: Option<f64>,
    pub lines: usize,
    pub partition_functions: usize,
}

impl std::fmt::Display for CacheInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let freq = |v: Option<f64>| v.map(|v| format!("{:.3}", v)).unwrap_or_else(|| "-".to_string());
        writeln!(f, "Cache Information:")?;
        writeln!(f, "  Version: {}", self.version)?;
        writeln!(f, "  Minimal frequency: {}", freq(self.min_frequency))?;
        writeln!(f, "  Maximal frequency: {}", freq(self.max_frequency))?;
        writeln!(f, "  Lines: {}", self.lines)?;
        writeln!(f, "  Partition functions: {}", self.partition_functions)
    }
}
