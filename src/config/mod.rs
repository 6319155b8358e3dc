pub mod cli;
pub mod toml_config;

pub use toml_config::ScoutConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "deal-scout")]
#[command(about = "Flags marketplace vehicle listings priced below reference value")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "deal-scout.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    pub monitor: Option<bool>,

    /// Classify listings but do not write any output
    #[arg(long)]
    pub dry_run: bool,

    /// Override the snapshot file to read listings from
    #[arg(long)]
    pub snapshot: Option<String>,

    /// Search only these models (repeatable); replaces the configured list
    #[arg(long = "model")]
    pub models: Vec<String>,

    #[arg(long)]
    pub min_year: Option<i32>,

    #[arg(long)]
    pub max_year: Option<i32>,

    #[arg(long)]
    pub max_price: Option<u32>,

    /// Fraction of the reference price counted as a good deal, e.g. 0.8
    #[arg(long)]
    pub tolerance: Option<f64>,
}

#[cfg(feature = "cli")]
impl CliArgs {
    /// Applies command-line overrides. Runs before validation so overridden
    /// values are checked like file values.
    pub fn apply_overrides(&self, config: &mut ScoutConfig) {
        if let Some(snapshot) = &self.snapshot {
            config.source.snapshot_path = snapshot.clone();
        }
        if !self.models.is_empty() {
            config.models = self.models.clone();
        }
        if let Some(min_year) = self.min_year {
            config.filters.min_year = min_year;
        }
        if let Some(max_year) = self.max_year {
            config.filters.max_year = max_year;
        }
        if let Some(max_price) = self.max_price {
            config.filters.max_price = max_price;
        }
        if let Some(tolerance) = self.tolerance {
            config.filters.price_tolerance = tolerance;
        }
    }
}
