pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

pub use http_fetcher::{FetchOptions, HttpFetcher};

/// Feed retrieval seam.
///
/// Implementations return the raw response body; callers are expected to
/// reduce any error to "zero items from this source".
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
