pub mod aggregator;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod recent;

pub use aggregator::{AggregatorOptions, FetchOutcome, SearchAggregator, SearchEvent};
pub use client::{KakaoSearchClient, SearchClient};
pub use error::{FetchError, StoreError};
pub use models::{Document, DocumentOrigin, RecentSearchEntry, SearchFilter};
pub use recent::{MemoryRecentStore, RecentSearchStore, SqliteRecentStore};
