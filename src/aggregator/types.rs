use serde::{Deserialize, Serialize};

use crate::models::{Document, RecentSearchEntry};

/// Events for the owning screen / 推送给界面的事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchEvent {
    /// First page of a query; replaces the displayed list / 替换列表
    ReplaceResults { documents: Vec<Document> },
    /// Later page; appended to the displayed list / 追加列表
    AppendResults { documents: Vec<Document> },
    /// Recent terms, most recent first; never empty / 最近搜索词
    ShowRecent { entries: Vec<RecentSearchEntry> },
    /// The in-flight request failed / 请求失败
    FetchFailed { reason: String },
}

/// What an aggregator operation ended up doing / 操作结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Nothing dispatched (empty query, idle session, unchanged filter, fetch in flight)
    Skipped,
    /// Results delivered for `page`
    Delivered { page: u32, count: usize },
    /// Completed after being superseded; dropped
    Discarded { generation: u64 },
    /// Reported as `FetchFailed`
    Failed,
}
