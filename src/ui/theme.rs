//! Terminal styles for cache reports

use owo_colors::{OwoColorize, Style};
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub label: Style,
    pub dim: Style,
    /// Species and isotopologue names
    pub species: Style,
    /// Catalog names (origin and dbsource)
    pub catalog: Style,
}

impl Theme {
    /// Colors only on a terminal, and never when `NO_COLOR` is set.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        if no_color || !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            label: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            species: Style::new().bright_white().bold(),
            catalog: Style::new().blue(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            label: Style::new(),
            dim: Style::new(),
            species: Style::new(),
            catalog: Style::new(),
        }
    }

    /// `species (origin, dbsource)`, the key of a partition function
    pub fn catalog_label(&self, species: &str, origin: &str, dbsource: &str) -> String {
        format!(
            "{} ({}, {})",
            species.style(self.species.clone()),
            origin.style(self.catalog.clone()),
            dbsource.style(self.catalog.clone())
        )
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_catalog_label() {
        let label = Theme::plain().catalog_label("CO", "cdms", "jpl");
        assert_eq!(label, "CO (cdms, jpl)");
    }

    #[test]
    fn test_colored_catalog_label_keeps_text() {
        let label = Theme::colored().catalog_label("13CO", "cdms", "cdms");
        assert!(label.contains("\u{1b}["));
        assert_eq!(console::strip_ansi_codes(&label), "13CO (cdms, cdms)");
    }
}
