use crate::core::Pipeline;
use crate::domain::model::ScanResults;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug)]
pub struct ScanOutcome {
    pub results: ScanResults,
    /// What the load phase wrote, as reported by the pipeline.
    pub output: String,
}

pub struct ScanEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ScanEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Extract and transform only; nothing is written.
    pub async fn preview(&self) -> Result<ScanResults> {
        tracing::info!("Extracting listings...");
        let snapshot = self.pipeline.extract().await?;
        self.monitor.log_stats("extract");

        tracing::info!("Classifying listings...");
        let results = self.pipeline.transform(snapshot).await?;
        self.monitor.log_stats("transform");

        Ok(results)
    }

    pub async fn run(&self) -> Result<ScanOutcome> {
        tracing::info!("🚀 Starting scan");

        let results = self.preview().await?;

        tracing::info!("Saving {} records...", results.records().len());
        let output = self.pipeline.load(&results).await?;
        self.monitor.log_stats("load");
        tracing::info!("📁 Output saved to: {}", output);

        self.monitor.log_final_stats();
        Ok(ScanOutcome { results, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ListingRecord, RawListingText};
    use crate::domain::services::{BatchAggregator, ModelListings};
    use crate::domain::snapshot::ListingSnapshot;
    use crate::domain::{FilterConfig, ReferenceTable};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingPipeline {
        loads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Pipeline for CountingPipeline {
        async fn extract(&self) -> Result<ListingSnapshot> {
            Ok(ListingSnapshot::default())
        }

        async fn transform(&self, _snapshot: ListingSnapshot) -> Result<ScanResults> {
            let table = ReferenceTable::builtin();
            let filters = FilterConfig::default();
            let aggregator = BatchAggregator::new(&table, &filters)?;
            Ok(aggregator.aggregate(&[ModelListings {
                model: "Suzuki Hayabusa 1300".to_string(),
                listings: vec![RawListingText {
                    title: "2022 Suzuki Hayabusa".to_string(),
                    price_text: "$8,500".to_string(),
                    link: "https://www.facebook.com/marketplace/item/77/".to_string(),
                }],
            }]))
        }

        async fn load(&self, results: &ScanResults) -> Result<String> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{} records", results.records().len()))
        }
    }

    #[tokio::test]
    async fn test_run_loads_once() {
        let engine = ScanEngine::new(CountingPipeline::default());
        let outcome = engine.run().await.unwrap();

        assert_eq!(outcome.output, "1 records");
        let deals: Vec<&ListingRecord> = outcome.results.good_deals().collect();
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].reference_price, Some(11565));
        assert_eq!(engine.pipeline().loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_preview_does_not_load() {
        let engine = ScanEngine::new(CountingPipeline::default());
        let results = engine.preview().await.unwrap();

        assert_eq!(results.records().len(), 1);
        assert_eq!(engine.pipeline().loads.load(Ordering::SeqCst), 0);
    }
}
