//! Remote search clients / 远程搜索客户端
//!
//! The aggregator only talks to [`SearchClient`]; the bundled
//! [`KakaoSearchClient`] is the HTTP implementation.

pub mod kakao;
pub mod types;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{DocumentOrigin, SearchPage};

pub use kakao::KakaoSearchClient;

/// Blog and cafe search capability / 博客与咖啡馆搜索接口
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Search blog documents, `page` is 1-based / 搜索博客
    async fn search_blog(&self, query: &str, page: u32) -> Result<SearchPage, FetchError>;

    /// Search cafe documents, `page` is 1-based / 搜索咖啡馆
    async fn search_cafe(&self, query: &str, page: u32) -> Result<SearchPage, FetchError>;

    /// Dispatch to the method serving `origin`
    async fn search(
        &self,
        origin: DocumentOrigin,
        query: &str,
        page: u32,
    ) -> Result<SearchPage, FetchError> {
        match origin {
            DocumentOrigin::Blog => self.search_blog(query, page).await,
            DocumentOrigin::Cafe => self.search_cafe(query, page).await,
        }
    }
}
