//! Partition function tables

use serde::{Deserialize, Serialize};

/// First-value marker for a species known to have no published partition
/// function. Cached so the fetch layer does not keep asking for it.
pub const BLANK_PARTFUNC: f64 = -1.0;

/// Partition function of one species, as published by one catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionFunction {
    pub species: String,
    pub origin: String,
    pub dbsource: String,
    /// Temperatures in Kelvins
    pub temperature: Vec<f64>,
    /// Partition function values, index-aligned with `temperature`
    pub values: Vec<f64>,
}

impl PartitionFunction {
    pub fn new(
        species: impl Into<String>,
        temperature: Vec<f64>,
        values: Vec<f64>,
        origin: impl Into<String>,
        dbsource: impl Into<String>,
    ) -> Self {
        Self {
            species: species.into(),
            origin: origin.into(),
            dbsource: dbsource.into(),
            temperature,
            values,
        }
    }

    /// A placeholder recording that `species` has no partition function.
    pub fn blank(species: impl Into<String>, origin: impl Into<String>, dbsource: impl Into<String>) -> Self {
        Self::new(species, vec![0.0], vec![BLANK_PARTFUNC], origin, dbsource)
    }

    /// True when the table carries no usable values.
    pub fn is_blank(&self) -> bool {
        self.values.first().is_none_or(|v| *v == BLANK_PARTFUNC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(PartitionFunction::blank("HCO", "jpl", "jpl").is_blank());
        assert!(PartitionFunction::new("HCO", vec![], vec![], "jpl", "jpl").is_blank());

        let pf = PartitionFunction::new("CO", vec![9.375, 18.75], vec![3.7, 7.1], "cdms", "cdms");
        assert!(!pf.is_blank());
    }
}
