use crate::domain::model::{Classification, RawListingText, ScanResults};
use crate::domain::reference::ReferenceTable;
use crate::domain::services::classify::ListingClassifier;
use crate::domain::FilterConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::{DateTime, Utc};

/// Raw listings captured for one searched model, in page order.
#[derive(Debug, Clone, Default)]
pub struct ModelListings {
    pub model: String,
    pub listings: Vec<RawListingText>,
}

/// Classifies listings model by model and collects the accepted records.
pub struct BatchAggregator<'a> {
    classifier: ListingClassifier<'a>,
    max_results_per_model: usize,
    clock: fn() -> DateTime<Utc>,
}

impl<'a> BatchAggregator<'a> {
    /// Fails if `filters` is invalid, so a bad tolerance is reported once
    /// instead of on every listing.
    pub fn new(table: &'a ReferenceTable, filters: &'a FilterConfig) -> Result<Self> {
        filters.validate()?;
        Ok(Self {
            classifier: ListingClassifier::new(table, filters),
            max_results_per_model: filters.max_results_per_model,
            clock: Utc::now,
        })
    }

    /// Replaces the timestamp source used for `scraped_at`.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn aggregate<'b, I>(&self, batches: I) -> ScanResults
    where
        I: IntoIterator<Item = &'b ModelListings>,
    {
        let mut results = ScanResults::new();
        for batch in batches {
            self.aggregate_model(&batch.model, &batch.listings, &mut results);
        }
        results
    }

    /// Appends the accepted listings of one model to `results`. A listing that
    /// fails to classify is logged and dropped; the rest of the batch goes on.
    pub fn aggregate_model(
        &self,
        model: &str,
        listings: &[RawListingText],
        results: &mut ScanResults,
    ) {
        tracing::info!("🔎 Classifying listings for {}", model);

        for (index, raw) in listings.iter().take(self.max_results_per_model).enumerate() {
            results.stats.examined += 1;

            match self.classifier.classify(model, raw, (self.clock)()) {
                Ok(Classification::Accepted(record)) => {
                    tracing::debug!(
                        model,
                        index,
                        good_deal = record.is_good_deal,
                        "{} | {} | {}",
                        record.title,
                        record.asking_price,
                        record.deal_analysis
                    );
                    results.push(record);
                }
                Ok(Classification::Skipped(reason)) => {
                    tracing::debug!(model, index, "Skipped '{}': {}", raw.title, reason);
                    results.stats.skipped += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        model,
                        index,
                        "Error classifying listing '{}': {}",
                        raw.title,
                        e
                    );
                    results.stats.failed += 1;
                }
            }
        }
    }
}
