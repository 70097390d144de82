use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CategoryKey, RepositoryRecord};

/// Where popular repositories come from.
#[async_trait]
pub trait RepoSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Most-starred repositories for `key`, highest first.
    async fn fetch_popular(&self, key: &CategoryKey) -> Result<Vec<RepositoryRecord>>;
}
