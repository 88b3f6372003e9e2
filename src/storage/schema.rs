//! Database schema definitions

use crate::line::Line;
use rusqlite::types::Value;

/// Columns of the `line` table, in storage order.
///
/// Every statement touching `line` is assembled from this mapping, so a
/// field and its column can only be renamed in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineColumn {
    Species,
    Frequency,
    Uncertainty,
    EinsteinCoefficient,
    UpperLevelEnergy,
    UpperLevelStatisticalWeight,
    UpperLevelQuantumNumbers,
    LowerLevelEnergy,
    LowerLevelStatisticalWeight,
    LowerLevelQuantumNumbers,
    Origin,
    DbSource,
    Date,
}

impl LineColumn {
    pub const ALL: [LineColumn; 13] = [
        LineColumn::Species,
        LineColumn::Frequency,
        LineColumn::Uncertainty,
        LineColumn::EinsteinCoefficient,
        LineColumn::UpperLevelEnergy,
        LineColumn::UpperLevelStatisticalWeight,
        LineColumn::UpperLevelQuantumNumbers,
        LineColumn::LowerLevelEnergy,
        LineColumn::LowerLevelStatisticalWeight,
        LineColumn::LowerLevelQuantumNumbers,
        LineColumn::Origin,
        LineColumn::DbSource,
        LineColumn::Date,
    ];

    /// Columns forming the `sqod` uniqueness constraint
    pub const IDENTITY: [LineColumn; 5] = [
        LineColumn::Species,
        LineColumn::UpperLevelQuantumNumbers,
        LineColumn::LowerLevelQuantumNumbers,
        LineColumn::Origin,
        LineColumn::DbSource,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LineColumn::Species => "species",
            LineColumn::Frequency => "frequency",
            LineColumn::Uncertainty => "uncertainty",
            LineColumn::EinsteinCoefficient => "einstein_coefficient",
            LineColumn::UpperLevelEnergy => "upper_level_energy",
            LineColumn::UpperLevelStatisticalWeight => "upper_level_statistical_weight",
            LineColumn::UpperLevelQuantumNumbers => "upper_level_quantum_numbers",
            LineColumn::LowerLevelEnergy => "lower_level_energy",
            LineColumn::LowerLevelStatisticalWeight => "lower_level_statistical_weight",
            LineColumn::LowerLevelQuantumNumbers => "lower_level_quantum_numbers",
            LineColumn::Origin => "origin",
            LineColumn::DbSource => "dbsource",
            LineColumn::Date => "date",
        }
    }

    pub fn sql_type(&self) -> &'static str {
        match self {
            LineColumn::Frequency
            | LineColumn::Uncertainty
            | LineColumn::EinsteinCoefficient
            | LineColumn::UpperLevelEnergy
            | LineColumn::UpperLevelStatisticalWeight
            | LineColumn::LowerLevelEnergy
            | LineColumn::LowerLevelStatisticalWeight => "REAL",
            _ => "TEXT",
        }
    }

    pub fn is_identity(&self) -> bool {
        Self::IDENTITY.contains(self)
    }

    /// Read this column's value out of a line. `date` is passed separately
    /// because the store may stamp it.
    pub fn value_of(&self, line: &Line, date: &str) -> Value {
        match self {
            LineColumn::Species => Value::Text(line.species.clone()),
            LineColumn::Frequency => Value::Real(line.frequency),
            LineColumn::Uncertainty => Value::Real(line.err_frequency),
            LineColumn::EinsteinCoefficient => Value::Real(line.einstein_coefficient),
            LineColumn::UpperLevelEnergy => Value::Real(line.upper_level.energy),
            LineColumn::UpperLevelStatisticalWeight => Value::Real(line.upper_level.statistical_weight),
            LineColumn::UpperLevelQuantumNumbers => Value::Text(line.upper_level.quantum_numbers.clone()),
            LineColumn::LowerLevelEnergy => Value::Real(line.lower_level.energy),
            LineColumn::LowerLevelStatisticalWeight => Value::Real(line.lower_level.statistical_weight),
            LineColumn::LowerLevelQuantumNumbers => Value::Text(line.lower_level.quantum_numbers.clone()),
            LineColumn::Origin => Value::Text(line.origin.clone()),
            LineColumn::DbSource => Value::Text(line.dbsource.clone()),
            LineColumn::Date => Value::Text(date.to_string()),
        }
    }
}

/// Comma-separated list of the `line` columns
pub fn line_column_list() -> String {
    LineColumn::ALL.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
}

/// SQL to create the line table
pub fn create_line_table() -> String {
    let columns: Vec<String> = LineColumn::ALL
        .iter()
        .map(|c| format!("    {} {}", c.name(), c.sql_type()))
        .collect();
    let identity: Vec<&str> = LineColumn::IDENTITY.iter().map(|c| c.name()).collect();
    format!(
        "CREATE TABLE line (\n{},\n    CONSTRAINT sqod UNIQUE ({})\n)",
        columns.join(",\n"),
        identity.join(", ")
    )
}

/// Plain insert; a conflict surfaces as a constraint violation.
pub fn insert_line() -> String {
    let placeholders: Vec<String> = (1..=LineColumn::ALL.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO line ({}) VALUES ({})",
        line_column_list(),
        placeholders.join(", ")
    )
}

/// Insert that updates the non-identity columns in place on conflict.
///
/// The existing row is updated rather than deleted, so the partfunc
/// cleanup trigger never fires on an upsert.
pub fn upsert_line() -> String {
    let identity: Vec<&str> = LineColumn::IDENTITY.iter().map(|c| c.name()).collect();
    let assignments: Vec<String> = LineColumn::ALL
        .iter()
        .filter(|c| !c.is_identity())
        .map(|c| format!("{0} = excluded.{0}", c.name()))
        .collect();
    format!(
        "{} ON CONFLICT ({}) DO UPDATE SET {}",
        insert_line(),
        identity.join(", "),
        assignments.join(", ")
    )
}

/// SQL to delete one line by its full identity
pub const DELETE_LINE: &str = r#"
DELETE FROM line
WHERE species = ?1 AND origin = ?2 AND dbsource = ?3
  AND upper_level_quantum_numbers = ?4
  AND lower_level_quantum_numbers = ?5
"#;

/// SQL to create the partfunc table
pub const CREATE_PARTFUNC_TABLE: &str = r#"
CREATE TABLE partfunc (
    species TEXT,
    temperature BLOB,
    partfunc BLOB,
    origin TEXT,
    dbsource TEXT,
    CONSTRAINT spec UNIQUE (species, origin, dbsource)
)
"#;

pub const INSERT_PARTFUNC: &str =
    "INSERT INTO partfunc (species, temperature, partfunc, origin, dbsource) VALUES (?1, ?2, ?3, ?4, ?5)";

pub const UPSERT_PARTFUNC: &str = r#"
INSERT INTO partfunc (species, temperature, partfunc, origin, dbsource) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (species, origin, dbsource) DO UPDATE SET
    temperature = excluded.temperature,
    partfunc = excluded.partfunc
"#;

pub const SELECT_PARTFUNC: &str =
    "SELECT temperature, partfunc FROM partfunc WHERE species = ?1 AND origin = ?2 AND dbsource = ?3";

/// SQL to create the info table
pub const CREATE_INFO_TABLE: &str = r#"
CREATE TABLE info (
    version TEXT
)
"#;

/// Drops a partition function once the last line sharing its
/// (species, origin, dbsource) is gone.
pub const CREATE_SYNC_PARTFUNC_TRIGGER: &str = r#"
CREATE TRIGGER sync_partfunc AFTER DELETE ON line
WHEN NOT EXISTS (
    SELECT 1 FROM line
    WHERE species = old.species AND origin = old.origin AND dbsource = old.dbsource
)
BEGIN
    DELETE FROM partfunc
    WHERE species = old.species AND origin = old.origin AND dbsource = old.dbsource;
END
"#;

/// SQL to create indexes
///
/// No index on `line`: the `sqod` constraint already provides one, and a
/// (species, frequency) index costs more in size than it saves in lookups.
pub const CREATE_INDEXES: &[&str] = &["CREATE INDEX pfspecies ON partfunc(species)"];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<String> {
    let mut stmts = vec![
        create_line_table(),
        CREATE_PARTFUNC_TABLE.to_string(),
        CREATE_INFO_TABLE.to_string(),
    ];
    stmts.extend(CREATE_INDEXES.iter().map(|s| s.to_string()));
    stmts.push(CREATE_SYNC_PARTFUNC_TRIGGER.to_string());
    stmts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_table_has_every_column() {
        let sql = create_line_table();
        for column in LineColumn::ALL {
            assert!(sql.contains(column.name()), "missing {}", column.name());
        }
        assert!(sql.contains(
            "UNIQUE (species, upper_level_quantum_numbers, lower_level_quantum_numbers, origin, dbsource)"
        ));
    }

    #[test]
    fn test_upsert_only_updates_non_identity_columns() {
        let sql = upsert_line();
        assert!(sql.contains("frequency = excluded.frequency"));
        assert!(sql.contains("date = excluded.date"));
        assert!(!sql.contains("species = excluded.species"));
        assert!(!sql.contains("origin = excluded.origin"));
    }

    #[test]
    fn test_insert_placeholder_count() {
        let sql = insert_line();
        assert!(sql.contains("?13"));
        assert!(!sql.contains("?14"));
    }
}
