//! Kakao search API wire types / 接口数据结构

use serde::{Deserialize, Serialize};

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrResp {
    #[serde(rename = "errorType", default)]
    pub error_type: String,
    #[serde(default)]
    pub message: String,
}

/// Query string of one search request / 搜索请求参数
#[derive(Debug, Clone, Serialize)]
pub struct SearchParams<'a> {
    pub query: &'a str,
    pub page: u32,
    pub size: u32,
    pub sort: &'static str,
}

pub const BLOG_PATH: &str = "/v2/search/blog";
pub const CAFE_PATH: &str = "/v2/search/cafe";
