//! Shared data model / 数据模型

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which remote source(s) a search targets / 搜索类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFilter {
    #[default]
    All,
    Blog,
    Cafe,
}

impl SearchFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchFilter::All => "all",
            SearchFilter::Blog => "blog",
            SearchFilter::Cafe => "cafe",
        }
    }

    /// Sources queried under this filter, in merge order / 该类型需要查询的来源
    pub fn sources(&self) -> &'static [DocumentOrigin] {
        match self {
            SearchFilter::All => &[DocumentOrigin::Blog, DocumentOrigin::Cafe],
            SearchFilter::Blog => &[DocumentOrigin::Blog],
            SearchFilter::Cafe => &[DocumentOrigin::Cafe],
        }
    }
}

impl From<&str> for SearchFilter {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "blog" => SearchFilter::Blog,
            "cafe" => SearchFilter::Cafe,
            _ => SearchFilter::All,
        }
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source that produced a document / 文档来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentOrigin {
    Blog,
    Cafe,
}

impl DocumentOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentOrigin::Blog => "blog",
            DocumentOrigin::Cafe => "cafe",
        }
    }
}

impl fmt::Display for DocumentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result ordering requested from the API / 排序方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Accuracy,
    Recency,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Accuracy => "accuracy",
            SortOrder::Recency => "recency",
        }
    }
}

/// Document as returned by a source, before origin tagging / 未标记来源的文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub title: String,
    /// Summary text; the API calls it `contents` / 摘要
    #[serde(rename = "contents", default)]
    pub snippet: String,
    pub url: String,
    /// Blog or cafe name / 博客或咖啡馆名称
    #[serde(alias = "blogname", alias = "cafename", default)]
    pub source_name: String,
    #[serde(default)]
    pub thumbnail: String,
    /// ISO 8601 timestamp as sent by the API
    #[serde(default)]
    pub datetime: String,
}

impl RawDocument {
    /// Attach the origin of the source that returned this document / 标记来源
    pub fn tag(self, origin: DocumentOrigin) -> Document {
        let timestamp = DateTime::parse_from_rfc3339(&self.datetime).ok();
        Document {
            title: self.title,
            url: self.url,
            snippet: self.snippet,
            source_name: self.source_name,
            thumbnail: self.thumbnail,
            timestamp,
            origin,
        }
    }
}

/// One tagged search result / 搜索结果文档
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub source_name: String,
    pub thumbnail: String,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub origin: DocumentOrigin,
}

/// Paging metadata of one response / 分页元数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub pageable_count: u64,
    #[serde(default)]
    pub is_end: bool,
}

/// One page from a single source / 单个来源的一页结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub meta: PageMeta,
    #[serde(default)]
    pub documents: Vec<RawDocument>,
}

impl SearchPage {
    /// Tag every document with `origin`, keeping source order
    pub fn into_tagged(self, origin: DocumentOrigin) -> Vec<Document> {
        self.documents
            .into_iter()
            .map(|doc| doc.tag(origin))
            .collect()
    }
}

/// A previously submitted query / 最近搜索词
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSearchEntry {
    pub term: String,
    pub created_at: DateTime<Utc>,
}

impl RecentSearchEntry {
    pub fn new(term: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            term: term.into(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter_from_str() {
        assert_eq!(SearchFilter::from("blog"), SearchFilter::Blog);
        assert_eq!(SearchFilter::from(" CAFE "), SearchFilter::Cafe);
        assert_eq!(SearchFilter::from("all"), SearchFilter::All);
        assert_eq!(SearchFilter::from("unknown"), SearchFilter::All);
    }

    #[test]
    fn test_filter_sources_blog_first() {
        assert_eq!(
            SearchFilter::All.sources(),
            &[DocumentOrigin::Blog, DocumentOrigin::Cafe]
        );
        assert_eq!(SearchFilter::Cafe.sources(), &[DocumentOrigin::Cafe]);
    }

    #[test]
    fn test_raw_document_from_api_json() {
        let json = r#"{
            "title": "<b>cats</b> diary",
            "contents": "about cats",
            "url": "https://blog.example.com/1",
            "blogname": "cat blog",
            "thumbnail": "",
            "datetime": "2017-05-07T18:50:00.000+09:00"
        }"#;
        let raw: RawDocument = serde_json::from_str(json).unwrap();
        assert_eq!(raw.source_name, "cat blog");
        assert_eq!(raw.snippet, "about cats");

        let doc = raw.tag(DocumentOrigin::Blog);
        assert_eq!(doc.origin, DocumentOrigin::Blog);
        let ts = doc.timestamp.unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_cafename_alias_and_bad_datetime() {
        let json = r#"{"title": "t", "url": "u", "cafename": "cafe", "datetime": "yesterday"}"#;
        let doc = serde_json::from_str::<RawDocument>(json)
            .unwrap()
            .tag(DocumentOrigin::Cafe);
        assert_eq!(doc.source_name, "cafe");
        assert!(doc.timestamp.is_none());
    }
}
