//! Error types / 错误类型

use thiserror::Error;

use crate::models::DocumentOrigin;

/// Failure of a remote search request / 远程搜索请求失败
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Parse(String),

    /// One half of a dual-source fetch failed; the pair is abandoned / 双来源查询中一方失败
    #[error("{origin} search failed: {cause}")]
    Join {
        origin: DocumentOrigin,
        #[source]
        cause: Box<FetchError>,
    },
}

impl FetchError {
    pub fn join(origin: DocumentOrigin, cause: FetchError) -> Self {
        FetchError::Join {
            origin,
            cause: Box::new(cause),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Parse(e.to_string())
    }
}

/// Failure of the recent-search store / 最近搜索存储失败
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stored timestamp '{0}'")]
    Timestamp(String),
}
