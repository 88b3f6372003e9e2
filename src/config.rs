use crate::line::Line;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Catalogs that are queried live; lines fetched from them get a fresh date.
pub const DEFAULT_LIVE_CATALOGS: &[&str] = &["voparis", "vamdc", "splatalogue", "cdms", "jpl"];

/// Extension of locally imported catalog files
pub const DEFAULT_CATALOG_FILE_EXTENSION: &str = ".cat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub database: Option<String>,
    pub live_catalogs: Vec<String>,
    pub catalog_file_extension: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            database: None,
            live_catalogs: DEFAULT_LIVE_CATALOGS.iter().map(|s| s.to_string()).collect(),
            catalog_file_extension: DEFAULT_CATALOG_FILE_EXTENSION.to_string(),
        }
    }
}

impl CacheConfig {
    pub fn is_live_catalog(&self, name: &str) -> bool {
        self.live_catalogs.iter().any(|c| c.eq_ignore_ascii_case(name))
    }

    pub fn is_catalog_file(&self, name: &str) -> bool {
        !self.catalog_file_extension.is_empty() && name.contains(self.catalog_file_extension.as_str())
    }

    /// Whether a stored line should carry the time of insertion instead of
    /// its own `date`.
    pub fn stamps_date(&self, line: &Line) -> bool {
        self.is_live_catalog(&line.origin)
            || self.is_live_catalog(&line.dbsource)
            || self.is_catalog_file(&line.dbsource)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("linecache.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("linecache.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<CacheConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: CacheConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &CacheConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::EnergyLevel;

    fn line_from(origin: &str, dbsource: &str) -> Line {
        Line::new("CO", 115271.2, EnergyLevel::default(), EnergyLevel::default(), origin, dbsource)
    }

    #[test]
    fn test_stamps_live_and_file_sources() {
        let config = CacheConfig::default();
        assert!(config.stamps_date(&line_from("cdms", "cdms")));
        assert!(config.stamps_date(&line_from("JPL", "local")));
        assert!(config.stamps_date(&line_from("lab", "c028503.cat")));
        assert!(!config.stamps_date(&line_from("lab", "offline.db")));
    }

    #[test]
    fn test_injected_catalogs() {
        let config = CacheConfig {
            live_catalogs: vec!["hitran".to_string()],
            ..Default::default()
        };
        assert!(config.stamps_date(&line_from("hitran", "hitran")));
        assert!(!config.stamps_date(&line_from("cdms", "cdms")));
    }

    #[test]
    fn test_load_and_write_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linecache.toml");

        assert!(load_config(Some(&path)).unwrap().is_none());

        let config = CacheConfig {
            database: Some("lines.db".to_string()),
            ..Default::default()
        };
        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());

        let loaded = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: CacheConfig = toml::from_str("database = \"x.db\"").unwrap();
        assert_eq!(config.database.as_deref(), Some("x.db"));
        assert_eq!(config.catalog_file_extension, ".cat");
        assert!(config.is_live_catalog("vamdc"));
    }
}
