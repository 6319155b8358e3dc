use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{ListingRecord, RawListingText, ScanResults};
use crate::domain::services::BatchAggregator;
use crate::domain::snapshot::ListingSnapshot;
use crate::domain::ReferenceTable;
use crate::utils::error::{Result, ScoutError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use url::Url;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Reads a listing snapshot from `source`, classifies it, and writes the
/// results to `sink`.
pub struct ScanPipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
    table: ReferenceTable,
    base_url: Url,
    clock: fn() -> DateTime<Utc>,
}

impl<S: Storage, C: ConfigProvider> ScanPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Result<Self> {
        let table = config.reference_table()?;
        let base_url =
            Url::parse(config.base_url()).map_err(|e| ScoutError::InvalidConfigValueError {
                field: "source.base_url".to_string(),
                value: config.base_url().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            source,
            sink,
            config,
            table,
            base_url,
            clock: Utc::now,
        })
    }

    /// Replaces the clock used for record timestamps and output file names.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn render_files(&self, results: &ScanResults) -> Result<Vec<(String, Vec<u8>)>> {
        let stamp = (self.clock)().format("%Y%m%d_%H%M%S").to_string();
        let mut files = Vec::new();

        for format in self.config.output_formats() {
            match format.as_str() {
                "json" => {
                    let good_deals: Vec<&ListingRecord> = results.good_deals().collect();
                    files.push((
                        format!("all_listings_{}.json", stamp),
                        serde_json::to_vec_pretty(results.records())?,
                    ));
                    files.push((
                        format!("good_deals_{}.json", stamp),
                        serde_json::to_vec_pretty(&good_deals)?,
                    ));
                }
                "csv" => {
                    files.push((
                        format!("all_listings_{}.csv", stamp),
                        records_to_csv(results.records())?,
                    ));
                }
                other => {
                    return Err(ScoutError::InvalidConfigValueError {
                        field: "load.output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format".to_string(),
                    });
                }
            }
        }

        Ok(files)
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    model: &'a str,
    year: Option<i32>,
    title: &'a str,
    asking_price: &'a str,
    asking_price_value: Option<u32>,
    reference_price: Option<u32>,
    is_good_deal: bool,
    deal_analysis: &'a str,
    link: &'a str,
    scraped_at: String,
}

fn records_to_csv(records: &[ListingRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(CsvRow {
            model: &record.model,
            year: record.year,
            title: &record.title,
            asking_price: &record.asking_price,
            asking_price_value: record.asking_price_value,
            reference_price: record.reference_price,
            is_good_deal: record.is_good_deal,
            deal_analysis: &record.deal_analysis,
            link: &record.link,
            scraped_at: record.scraped_at.to_rfc3339(),
        })?;
    }
    writer
        .into_inner()
        .map_err(|e| ScoutError::IoError(e.into_error()))
}

fn bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ScanPipeline<S, C> {
    async fn extract(&self) -> Result<ListingSnapshot> {
        let path = self.config.snapshot_path();
        tracing::debug!("Reading listing snapshot from: {}", path);

        let data = self.source.read_file(path).await?;
        let snapshot = ListingSnapshot::from_json(&data)?;

        tracing::info!(
            "📥 Snapshot has {} searches, {} listings",
            snapshot.searches.len(),
            snapshot.searches.iter().map(|s| s.listings.len()).sum::<usize>()
        );
        Ok(snapshot)
    }

    async fn transform(&self, snapshot: ListingSnapshot) -> Result<ScanResults> {
        let filters = self.config.filters();
        let aggregator = BatchAggregator::new(&self.table, filters)?.with_clock(self.clock);
        let mut results = ScanResults::new();

        for model in self.config.target_models() {
            let mut raw_listings: Vec<RawListingText> = Vec::new();
            let mut captured = 0;

            for (index, listing) in snapshot
                .listings_for(model)
                .take(filters.max_results_per_model)
                .enumerate()
            {
                captured += 1;
                match listing.to_raw(&self.base_url) {
                    Ok(raw) => raw_listings.push(raw),
                    Err(e) => {
                        tracing::warn!(
                            model = model.as_str(),
                            index,
                            "Error extracting listing: {}",
                            e
                        );
                        results.stats.examined += 1;
                        results.stats.failed += 1;
                    }
                }
            }

            if captured == 0 {
                tracing::warn!("⚠️ No captured listings for {}", model);
                continue;
            }

            aggregator.aggregate_model(model, &raw_listings, &mut results);
        }

        tracing::info!(
            "Classified {} listings: {} kept, {} good deals, {} filtered, {} failed",
            results.stats.examined,
            results.stats.accepted,
            results.stats.good_deals,
            results.stats.skipped,
            results.stats.failed
        );
        Ok(results)
    }

    async fn load(&self, results: &ScanResults) -> Result<String> {
        let files = self.render_files(results)?;

        if let Some(archive) = self.config.archive_name() {
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = bundle(&files)?;
            self.sink.write_file(archive, &zip_data).await?;
            tracing::debug!("ZIP file ({} bytes) saved", zip_data.len());
            return Ok(archive.to_string());
        }

        let mut written = Vec::with_capacity(files.len());
        for (name, data) in &files {
            self.sink.write_file(name, data).await?;
            written.push(name.as_str());
        }
        Ok(written.join(", "))
    }
}
