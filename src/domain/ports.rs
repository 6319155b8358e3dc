use crate::domain::model::ScanResults;
use crate::domain::reference::ReferenceTable;
use crate::domain::snapshot::ListingSnapshot;
use crate::domain::FilterConfig;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn snapshot_path(&self) -> &str;
    fn base_url(&self) -> &str;
    fn target_models(&self) -> &[String];
    fn filters(&self) -> &FilterConfig;
    fn reference_table(&self) -> Result<ReferenceTable>;
    fn output_formats(&self) -> &[String];
    /// Name of the ZIP bundle to write, when compression is enabled.
    fn archive_name(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ListingSnapshot>;
    async fn transform(&self, snapshot: ListingSnapshot) -> Result<ScanResults>;
    async fn load(&self, results: &ScanResults) -> Result<String>;
}
