//! Recent search term persistence / 最近搜索词存储
//!
//! - insert: record a submitted term (moves an existing term to the front)
//! - list_recent: most-recent-first, capped to the store's limit

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::RecentSearchEntry;

pub use memory::MemoryRecentStore;
pub use sqlite::SqliteRecentStore;

/// Recent search store interface / 最近搜索存储接口
#[async_trait]
pub trait RecentSearchStore: Send + Sync {
    /// Record a submitted term / 记录搜索词
    async fn insert(&self, term: &str, created_at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Stored terms, most recent first / 按时间倒序列出
    async fn list_recent(&self) -> Result<Vec<RecentSearchEntry>, StoreError>;
}
