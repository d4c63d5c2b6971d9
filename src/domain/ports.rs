use crate::domain::model::{Doctor, JoinMode, Review};
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
    fn doctors_file(&self) -> &str;
    fn reviews_file(&self) -> &str;
    fn delimiter(&self) -> u8;
    fn page_size(&self) -> usize;
    fn join_mode(&self) -> JoinMode;
    fn highlight_markers(&self) -> (&str, &str);
}

/// Where the two datasets come from. Called once at start.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn doctors(&self) -> Result<Vec<Doctor>>;
    async fn reviews(&self) -> Result<Vec<Review>>;
}
