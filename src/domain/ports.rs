use crate::domain::model::{LaunchRecord, LaunchReport, Proximity, SiteSelection};
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
    fn dataset_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn site_selection(&self) -> SiteSelection;
    /// Lower payload bound in kg; `None` means the dataset's minimum.
    fn payload_min(&self) -> Option<f64>;
    /// Upper payload bound in kg; `None` means the dataset's maximum.
    fn payload_max(&self) -> Option<f64>;
    fn proximities(&self) -> Vec<Proximity>;
    fn strict_coordinates(&self) -> bool {
        false
    }
    fn request_timeout_seconds(&self) -> Option<u64> {
        None
    }
    fn archive_filename(&self) -> &str {
        "launch_report.zip"
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<LaunchRecord>>;
    async fn transform(&self, data: Vec<LaunchRecord>) -> Result<LaunchReport>;
    async fn load(&self, report: LaunchReport) -> Result<String>;
}
