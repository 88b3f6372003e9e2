//! Linecache CLI - inspect and query an offline line catalog cache

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use linecache::config::{self, CacheConfig};
use linecache::ui::{self, Icons};
use linecache::{LineCache, SearchFilter, SpeciesFilter};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "linecache")]
#[command(version)]
#[command(about = "Offline cache of spectroscopic line catalogs and partition functions")]
#[command(long_about = r#"
Linecache keeps a local SQLite copy of line catalogs, enabling:
  • Offline, reproducible line searches
  • Partition function lookups per species and catalog

Example usage:
  linecache create --database lines.db
  linecache search --database lines.db --fmin 115000 --fmax 116000 --species "CO*"
  linecache partfunc --database lines.db --species CO --origin cdms --dbsource cdms
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty cache
    Create {
        /// Path to the cache file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Schema version recorded in the cache
        #[arg(long = "schema-version", default_value = "1.00")]
        schema_version: String,

        /// Replace an existing file
        #[arg(long)]
        overwrite: bool,
    },

    /// Show version and contents of a cache
    Info {
        /// Path to the cache file
        #[arg(short, long)]
        database: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Search cached lines
    Search {
        /// Path to the cache file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Minimum frequency (MHz)
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        fmin: f64,

        /// Maximum frequency (MHz)
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        fmax: f64,

        /// Species, repeatable; `*` is a wildcard
        #[arg(short, long)]
        species: Vec<String>,

        /// Defining catalog (case-insensitive)
        #[arg(long, default_value = "All")]
        origin: String,

        /// Source catalog
        #[arg(long, default_value = "All")]
        dbsource: String,

        /// Maximum upper level energy (K)
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        energy: f64,

        /// Minimum Einstein coefficient
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        einstein: f64,

        /// Read the whole filter from a JSON file instead
        #[arg(long, conflicts_with_all = ["fmin", "fmax", "species", "origin", "dbsource", "energy", "einstein"])]
        filter: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show the partition function of a species
    Partfunc {
        /// Path to the cache file
        #[arg(short, long)]
        database: Option<PathBuf>,

        #[arg(short, long)]
        species: String,

        #[arg(long)]
        origin: String,

        #[arg(long)]
        dbsource: String,

        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Check whether a file is a usable cache
    Check {
        path: PathBuf,
    },

    /// Write a default configuration file
    InitConfig {
        /// Where to write the configuration
        #[arg(default_value = "linecache.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Create { database, schema_version, overwrite } => {
            let cache = open_cache(database, &config);
            cache.create(&schema_version, overwrite)?;
            ui::success(&format!("Created cache {} (version {})", cache.path().display(), schema_version));
        }

        Commands::Info { database, format } => {
            let cache = open_cache(database, &config);
            let info = cache.info()?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&info)?),
                Format::Text => {
                    ui::header(Icons::DATABASE, &format!("{}", cache.path().display()));
                    ui::block(&ui::info_table(&info));
                }
            }
        }

        Commands::Search {
            database,
            fmin,
            fmax,
            species,
            origin,
            dbsource,
            energy,
            einstein,
            filter,
            format,
        } => {
            let cache = open_cache(database, &config);
            let filter = match filter {
                Some(path) => read_filter(&path)?,
                None => SearchFilter {
                    fmin,
                    fmax,
                    species: SpeciesFilter::from_tokens(species),
                    origin,
                    dbsource,
                    energy,
                    einstein,
                },
            };

            let lines = cache.search(&filter)?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&lines)?),
                Format::Text => {
                    ui::status(Icons::SEARCH, "Matches", &lines.len().to_string());
                    if lines.is_empty() {
                        ui::empty("No lines found.");
                    } else {
                        ui::block(&ui::lines_table(&lines));
                    }
                }
            }
        }

        Commands::Partfunc { database, species, origin, dbsource, format } => {
            let cache = open_cache(database, &config);
            let pf = cache.partition_function(&species, &origin, &dbsource)?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&pf)?),
                Format::Text => {
                    ui::catalog_header(Icons::THERMOMETER, &pf.species, &pf.origin, &pf.dbsource);
                    ui::block(&ui::partfunc_table(&pf));
                }
            }
        }

        Commands::Check { path } => {
            if linecache::is_cache_file(&path) {
                ui::success(&format!("{} is a line cache", path.display()));
            } else {
                ui::warn(&format!("{} is not a line cache", path.display()));
                std::process::exit(2);
            }
        }

        Commands::InitConfig { path, force } => {
            config::write_config(&path, &CacheConfig::default(), force)?;
            ui::success(&format!("Wrote {}", path.display()));
            ui::block(&ui::dim("Edit live_catalogs to change which sources get a fresh date."));
        }
    }

    Ok(())
}

fn open_cache(database: Option<PathBuf>, config: &CacheConfig) -> LineCache {
    let path = database
        .or_else(|| config.database.as_ref().map(PathBuf::from))
        .unwrap_or_else(config::default_database_path);
    tracing::debug!("Using cache {}", path.display());
    LineCache::with_config(path, config.clone())
}

fn read_filter(path: &Path) -> anyhow::Result<SearchFilter> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}
