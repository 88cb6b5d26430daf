//! Search aggregation core / 搜索聚合核心
//!
//! - submit: record the term, reset paging, fetch page 1
//! - request_next_page: fetch the current page and append it
//! - change_filter: re-run the active query under another filter
//! - list_recent: show recent terms when there are any
//!
//! Under the `All` filter blog and cafe are queried concurrently and merged
//! blog-first; if either fails the whole page fails.

pub mod manager;
pub mod session;
pub mod types;

pub use manager::{AggregatorOptions, SearchAggregator};
pub use session::SearchSession;
pub use types::{FetchOutcome, SearchEvent};
