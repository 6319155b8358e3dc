//! Listing normalization and deal evaluation. Pure and synchronous: no I/O,
//! no clocks except the one injected into the aggregator.

pub mod aggregate;
pub mod classify;
pub mod evaluate;
pub mod extract;

pub use aggregate::{BatchAggregator, ModelListings};
pub use classify::ListingClassifier;
pub use evaluate::evaluate;
pub use extract::{extract_price, extract_year, split_spans};
