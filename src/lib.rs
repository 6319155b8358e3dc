pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::{cli::LocalStorage, ScoutConfig};

pub use core::{engine::ScanEngine, pipeline::ScanPipeline};
pub use domain::model::{DealVerdict, ListingRecord, RawListingText, ScanResults};
pub use domain::{FilterConfig, ReferenceTable};
pub use utils::error::{Result, ScoutError};
