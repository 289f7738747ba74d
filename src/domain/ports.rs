use crate::domain::model::{Character, LookupSummary};
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
    fn base_url(&self) -> &str;
    fn locale(&self) -> Option<&str>;
    fn api_key(&self) -> Option<&str>;
    fn default_realm(&self) -> Option<&str>;
    fn concurrent_requests(&self) -> usize;
    fn request_timeout_secs(&self) -> u64;
    fn drop_rate(&self) -> f64;
    fn include_total(&self) -> bool;
    fn output_formats(&self) -> &[String];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Character>>;
    async fn transform(&self, characters: Vec<Character>) -> Result<LookupSummary>;
    async fn load(&self, summary: &LookupSummary) -> Result<String>;
}
