use crate::line::Line;
use crate::partfunc::PartitionFunction;
use crate::storage::CacheInfo;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "Frequency (MHz)")]
    frequency: String,
    #[tabled(rename = "Err (MHz)")]
    err_frequency: String,
    #[tabled(rename = "Aij")]
    einstein: String,
    #[tabled(rename = "Eup (K)")]
    upper_energy: String,
    #[tabled(rename = "Upper")]
    upper: String,
    #[tabled(rename = "Lower")]
    lower: String,
    #[tabled(rename = "Origin")]
    origin: String,
    #[tabled(rename = "Source")]
    dbsource: String,
}

impl From<&Line> for LineRow {
    fn from(line: &Line) -> Self {
        Self {
            species: line.species.clone(),
            frequency: format!("{:.4}", line.frequency),
            err_frequency: format!("{:.4}", line.err_frequency),
            einstein: format!("{:.3e}", line.einstein_coefficient),
            upper_energy: format!("{:.2}", line.upper_level.energy),
            upper: line.upper_level.quantum_numbers.clone(),
            lower: line.lower_level.quantum_numbers.clone(),
            origin: line.origin.clone(),
            dbsource: line.dbsource.clone(),
        }
    }
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct PartfuncRow {
    #[tabled(rename = "T (K)")]
    temperature: String,
    #[tabled(rename = "Q(T)")]
    value: String,
}

pub fn lines_table(lines: &[Line]) -> String {
    if lines.is_empty() {
        return String::new();
    }
    Table::new(lines.iter().map(LineRow::from)).with(Style::rounded()).to_string()
}

pub fn info_table(info: &CacheInfo) -> String {
    let freq = |v: Option<f64>| v.map(|v| format!("{:.3} MHz", v)).unwrap_or_else(|| "-".to_string());
    let rows = vec![
        MetricRow { metric: "Version".to_string(), value: info.version.clone() },
        MetricRow { metric: "Minimal frequency".to_string(), value: freq(info.min_frequency) },
        MetricRow { metric: "Maximal frequency".to_string(), value: freq(info.max_frequency) },
        MetricRow { metric: "Lines".to_string(), value: info.lines.to_string() },
        MetricRow { metric: "Partition functions".to_string(), value: info.partition_functions.to_string() },
    ];
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn partfunc_table(pf: &PartitionFunction) -> String {
    let rows = pf.temperature.iter().zip(&pf.values).map(|(t, q)| PartfuncRow {
        temperature: format!("{:.3}", t),
        value: format!("{:.4}", q),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::EnergyLevel;

    #[test]
    fn test_lines_table_lists_each_line() {
        let lines = vec![
            Line::new("CO", 115271.2018, EnergyLevel::new(5.53, 3.0, "1"), EnergyLevel::new(0.0, 1.0, "0"), "cdms", "cdms"),
            Line::new("13CO", 110201.354, EnergyLevel::new(5.29, 3.0, "1"), EnergyLevel::new(0.0, 1.0, "0"), "cdms", "cdms"),
        ];
        let table = lines_table(&lines);
        assert!(table.contains("115271.2018"));
        assert!(table.contains("13CO"));
        assert!(lines_table(&[]).is_empty());
    }

    #[test]
    fn test_partfunc_table_pairs_columns() {
        let pf = PartitionFunction::new("CO", vec![9.375, 300.0], vec![3.7234, 108.8651], "cdms", "cdms");
        let table = partfunc_table(&pf);
        assert!(table.contains("300.000"));
        assert!(table.contains("108.8651"));
    }
}
