//! Line types - spectral transitions as stored in the cache
//!
//! A [`Line`] is one transition of a species between an upper and a lower
//! [`EnergyLevel`]. Its identity in the cache is
//! `(species, upper QN, lower QN, origin, dbsource)`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scale applied to the upper level energy in the display row
const DISPLAY_ENERGY_SCALE: f64 = 1.44;

/// An energy level of a transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyLevel {
    /// Level energy in Kelvins
    pub energy: f64,
    /// Statistical weight (degeneracy)
    pub statistical_weight: f64,
    /// Catalog-specific quantum number label
    pub quantum_numbers: String,
}

impl EnergyLevel {
    pub fn new(energy: f64, statistical_weight: f64, quantum_numbers: impl Into<String>) -> Self {
        Self {
            energy,
            statistical_weight,
            quantum_numbers: quantum_numbers.into(),
        }
    }
}

/// A single spectral line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Species or isotopologue name, e.g. `CO` or `13CO`
    pub species: String,
    /// Rest frequency in MHz
    pub frequency: f64,
    /// Frequency uncertainty in MHz
    pub err_frequency: f64,
    /// Spontaneous emission rate (s-1)
    pub einstein_coefficient: f64,
    pub upper_level: EnergyLevel,
    pub lower_level: EnergyLevel,
    /// Catalog that originally defined the transition (cdms, jpl, ...)
    pub origin: String,
    /// Catalog the record was last read from
    pub dbsource: String,
    /// ISO-8601 timestamp of the last fetch or update
    pub date: String,
    /// Source the row was stored under, filled in by searches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_source: Option<String>,
}

impl Line {
    /// Create a new line with minimal required fields
    pub fn new(
        species: impl Into<String>,
        frequency: f64,
        upper_level: EnergyLevel,
        lower_level: EnergyLevel,
        origin: impl Into<String>,
        dbsource: impl Into<String>,
    ) -> Self {
        Self {
            species: species.into(),
            frequency,
            upper_level,
            lower_level,
            origin: origin.into(),
            dbsource: dbsource.into(),
            ..Default::default()
        }
    }

    pub fn with_err_frequency(mut self, err_frequency: f64) -> Self {
        self.err_frequency = err_frequency;
        self
    }

    pub fn with_einstein_coefficient(mut self, einstein_coefficient: f64) -> Self {
        self.einstein_coefficient = einstein_coefficient;
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// The source under which this line is stored in the cache.
    ///
    /// Lines read back from a search carry the row's source in
    /// `previous_source`; callers may have re-pointed `dbsource` since.
    pub fn stored_source(&self) -> &str {
        self.previous_source.as_deref().unwrap_or(&self.dbsource)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} | {:12.3} | {:7.3} | {:6.1} | {} -- {}",
            self.species,
            self.frequency,
            self.err_frequency,
            self.upper_level.energy * DISPLAY_ENERGY_SCALE,
            self.upper_level.quantum_numbers,
            self.lower_level.quantum_numbers
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_builder() {
        let line = Line::new(
            "CO",
            115271.2018,
            EnergyLevel::new(5.53, 3.0, "1"),
            EnergyLevel::new(0.0, 1.0, "0"),
            "cdms",
            "cdms",
        )
        .with_err_frequency(0.0005)
        .with_einstein_coefficient(7.203e-8)
        .with_date("2024-01-01T00:00:00");

        assert_eq!(line.species, "CO");
        assert_eq!(line.upper_level.quantum_numbers, "1");
        assert_eq!(line.einstein_coefficient, 7.203e-8);
        assert!(line.previous_source.is_none());
    }

    #[test]
    fn test_stored_source_prefers_previous() {
        let mut line = Line::new("CO", 1.0, EnergyLevel::default(), EnergyLevel::default(), "cdms", "jpl");
        assert_eq!(line.stored_source(), "jpl");

        line.previous_source = Some("cdms".to_string());
        assert_eq!(line.stored_source(), "cdms");
    }

    #[test]
    fn test_display_row() {
        let line = Line::new(
            "CO",
            115271.2018,
            EnergyLevel::new(5.0, 3.0, "1"),
            EnergyLevel::new(0.0, 1.0, "0"),
            "cdms",
            "cdms",
        );
        let row = line.to_string();
        assert!(row.starts_with("CO "));
        assert!(row.contains("115271.202"));
        assert!(row.ends_with("1 -- 0"));
    }
}
