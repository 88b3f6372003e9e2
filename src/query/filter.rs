//! Search filters and their translation into a SQL predicate

use crate::storage::schema::LineColumn;
use crate::{Error, Result};
use serde::Deserialize;

/// Wildcard placeholder for "no selection" on string filters
pub const ALL: &str = "All";

/// Decimals used when rendering frequency and energy bounds
const FIXED_DECIMALS: usize = 6;

/// Significant digits used when rendering the Einstein coefficient floor
const SIGNIFICANT_DIGITS: usize = 6;

/// Species selection of a search.
///
/// Tokens are OR-ed together. A token containing `*` is a pattern where `*`
/// matches any run of characters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum SpeciesFilter {
    #[default]
    All,
    Any(Vec<String>),
}

impl SpeciesFilter {
    /// Build a filter from tokens. No tokens, or the single token `All`,
    /// selects every species.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        match tokens.as_slice() {
            [] => SpeciesFilter::All,
            [only] if only == ALL => SpeciesFilter::All,
            _ => SpeciesFilter::Any(tokens),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SpeciesFilter::All)
    }
}

impl From<&str> for SpeciesFilter {
    fn from(species: &str) -> Self {
        Self::from_tokens([species])
    }
}

impl From<String> for SpeciesFilter {
    fn from(species: String) -> Self {
        Self::from_tokens([species])
    }
}

impl From<Vec<String>> for SpeciesFilter {
    fn from(species: Vec<String>) -> Self {
        Self::from_tokens(species)
    }
}

impl From<&[&str]> for SpeciesFilter {
    fn from(species: &[&str]) -> Self {
        Self::from_tokens(species.iter().copied())
    }
}

impl TryFrom<serde_json::Value> for SpeciesFilter {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(SpeciesFilter::All),
            Value::String(s) => Ok(SpeciesFilter::from(s)),
            Value::Array(items) => {
                let mut tokens = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => tokens.push(s),
                        other => return Err(Error::MalformedFilter(other.to_string())),
                    }
                }
                Ok(SpeciesFilter::from_tokens(tokens))
            }
            other => Err(Error::MalformedFilter(other.to_string())),
        }
    }
}

/// Parameters of a line search.
///
/// Negative numeric bounds and `All` strings mean "no constraint".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchFilter {
    /// Minimum frequency in MHz
    pub fmin: f64,
    /// Maximum frequency in MHz
    pub fmax: f64,
    pub species: SpeciesFilter,
    /// Defining catalog, matched case-insensitively
    pub origin: String,
    /// Source catalog, matched exactly
    pub dbsource: String,
    /// Maximum upper level energy in Kelvins
    pub energy: f64,
    /// Minimum Einstein coefficient
    pub einstein: f64,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            fmin: -1.0,
            fmax: -1.0,
            species: SpeciesFilter::All,
            origin: ALL.to_string(),
            dbsource: ALL.to_string(),
            energy: -1.0,
            einstein: -1.0,
        }
    }
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frequency(mut self, fmin: f64, fmax: f64) -> Self {
        self.fmin = fmin;
        self.fmax = fmax;
        self
    }

    pub fn species(mut self, species: impl Into<SpeciesFilter>) -> Self {
        self.species = species.into();
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn dbsource(mut self, dbsource: impl Into<String>) -> Self {
        self.dbsource = dbsource.into();
        self
    }

    pub fn max_energy(mut self, energy: f64) -> Self {
        self.energy = energy;
        self
    }

    pub fn min_einstein(mut self, einstein: f64) -> Self {
        self.einstein = einstein;
        self
    }

    /// Translate the filter into a WHERE clause with positional parameters.
    pub fn to_predicate(&self) -> Predicate {
        let mut predicate = Predicate::default();

        let fmin = if self.fmin < 0.0 { 0.0 } else { self.fmin };
        predicate.push(format!("{} >= ?", LineColumn::Frequency.name()), fixed(fmin));

        if self.fmax > 0.0 {
            predicate.push(format!("{} <= ?", LineColumn::Frequency.name()), fixed(self.fmax));
        }

        if let SpeciesFilter::Any(tokens) = &self.species
            && !tokens.is_empty()
        {
            // AND binds tighter than OR: the alternatives need their own group
            let mut alternatives = Vec::with_capacity(tokens.len());
            for token in tokens {
                let (clause, param) = species_clause(token);
                alternatives.push(clause);
                predicate.params.push(param);
            }
            predicate.clauses.push(format!("({})", alternatives.join(" OR ")));
        }

        if self.origin != ALL {
            predicate.push(
                format!("{} = ? COLLATE NOCASE", LineColumn::Origin.name()),
                self.origin.clone(),
            );
        }

        if self.dbsource != ALL {
            predicate.push(format!("{} = ?", LineColumn::DbSource.name()), self.dbsource.clone());
        }

        if self.energy > 0.0 {
            predicate.push(
                format!("{} <= ?", LineColumn::UpperLevelEnergy.name()),
                fixed(self.energy),
            );
        }

        if self.einstein > 0.0 {
            // Rates span many decades: keep significant digits, not decimals
            predicate.push(
                format!("{} >= ?", LineColumn::EinsteinCoefficient.name()),
                format!("{:.*e}", SIGNIFICANT_DIGITS - 1, self.einstein),
            );
        }

        predicate
    }
}

/// A conjunction of SQL conditions and their bound values, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    pub clauses: Vec<String>,
    pub params: Vec<String>,
}

impl Predicate {
    fn push(&mut self, clause: String, param: String) {
        self.clauses.push(clause);
        self.params.push(param);
    }

    /// The WHERE clause body (without the `WHERE` keyword)
    pub fn where_clause(&self) -> String {
        self.clauses.join(" AND ")
    }
}

fn fixed(value: f64) -> String {
    format!("{:.*}", FIXED_DECIMALS, value)
}

/// Condition and bound value for one species token.
fn species_clause(token: &str) -> (String, String) {
    if !token.contains('*') {
        return (format!("{} = ?", LineColumn::Species.name()), token.to_string());
    }

    let mut pattern = String::with_capacity(token.len());
    for ch in token.chars() {
        match ch {
            '*' => pattern.push('%'),
            '%' | '_' | '\\' => {
                pattern.push('\\');
                pattern.push(ch);
            }
            _ => pattern.push(ch),
        }
    }
    (format!("{} LIKE ? ESCAPE '\\'", LineColumn::Species.name()), pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_only_bounds_fmin() {
        let predicate = SearchFilter::new().to_predicate();
        assert_eq!(predicate.where_clause(), "frequency >= ?");
        assert_eq!(predicate.params, vec!["0.000000"]);
    }

    #[test]
    fn test_frequency_range() {
        let predicate = SearchFilter::new().frequency(100.0, 200.0).to_predicate();
        assert_eq!(predicate.where_clause(), "frequency >= ? AND frequency <= ?");
        assert_eq!(predicate.params, vec!["100.000000", "200.000000"]);
    }

    #[test]
    fn test_species_group_is_parenthesized() {
        let filter = SearchFilter::new()
            .species(&["CO", "H2C*"][..])
            .origin("CDMS");
        let predicate = filter.to_predicate();
        assert_eq!(
            predicate.where_clause(),
            "frequency >= ? AND (species = ? OR species LIKE ? ESCAPE '\\') AND origin = ? COLLATE NOCASE"
        );
        assert_eq!(predicate.params, vec!["0.000000", "CO", "H2C%", "CDMS"]);
    }

    #[test]
    fn test_wildcard_escapes_like_metacharacters() {
        let (clause, param) = species_clause("CH3OH_v*");
        assert!(clause.contains("LIKE"));
        assert_eq!(param, "CH3OH\\_v%");

        let (clause, param) = species_clause("CH3OH_v0");
        assert_eq!(clause, "species = ?");
        assert_eq!(param, "CH3OH_v0");
    }

    #[test]
    fn test_all_species_aliases() {
        assert!(SpeciesFilter::from("All").is_all());
        assert!(SpeciesFilter::from_tokens(Vec::<String>::new()).is_all());
        assert_eq!(SpeciesFilter::from("CO"), SpeciesFilter::Any(vec!["CO".to_string()]));
    }

    #[test]
    fn test_energy_and_einstein_bounds() {
        let predicate = SearchFilter::new()
            .dbsource("jpl")
            .max_energy(150.0)
            .min_einstein(1e-7)
            .to_predicate();
        assert_eq!(
            predicate.where_clause(),
            "frequency >= ? AND dbsource = ? AND upper_level_energy <= ? AND einstein_coefficient >= ?"
        );
        assert_eq!(predicate.params[2], "150.000000");
        assert_eq!(predicate.params[3], "1.00000e-7");

        let predicate = SearchFilter::new().min_einstein(7.2034567e-8).to_predicate();
        assert_eq!(predicate.params[1], "7.20346e-8");
    }

    #[test]
    fn test_empty_species_set_adds_no_clause() {
        let predicate = SearchFilter::new()
            .species(SpeciesFilter::Any(vec![]))
            .dbsource("cdms")
            .to_predicate();
        assert_eq!(predicate.where_clause(), "frequency >= ? AND dbsource = ?");
        assert_eq!(predicate.params, vec!["0.000000", "cdms"]);
    }

    #[test]
    fn test_species_filter_from_json() {
        let filter: SearchFilter =
            serde_json::from_str(r#"{"fmin": 1000.0, "species": ["CO", "HC3N*"]}"#).unwrap();
        assert_eq!(filter.fmin, 1000.0);
        assert_eq!(filter.fmax, -1.0);
        assert_eq!(
            filter.species,
            SpeciesFilter::Any(vec!["CO".to_string(), "HC3N*".to_string()])
        );

        let filter: SearchFilter = serde_json::from_str(r#"{"species": "All"}"#).unwrap();
        assert!(filter.species.is_all());
    }

    #[test]
    fn test_malformed_species_filter() {
        let err = SpeciesFilter::try_from(serde_json::json!(42)).unwrap_err();
        assert!(matches!(err, Error::MalformedFilter(_)));

        let err = SpeciesFilter::try_from(serde_json::json!(["CO", 3])).unwrap_err();
        assert!(matches!(err, Error::MalformedFilter(_)));

        assert!(serde_json::from_str::<SearchFilter>(r#"{"species": {"name": "CO"}}"#).is_err());
    }
}
