//! Kakao (Daum) search HTTP client / Kakao 搜索 HTTP 客户端

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

use super::types::{ErrResp, SearchParams, BLOG_PATH, CAFE_PATH};
use super::SearchClient;
use crate::config::AppConfig;
use crate::error::FetchError;
use crate::models::{DocumentOrigin, SearchPage, SortOrder};

/// Kakao search client
pub struct KakaoSearchClient {
    client: Client,
    base_url: Url,
    api_key: String,
    page_size: u32,
    sort: SortOrder,
    timeout: Duration,
}

impl KakaoSearchClient {
    pub fn new(
        base_url: &str,
        api_key: String,
        page_size: u32,
        sort: SortOrder,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::Network(format!("invalid base url '{}': {}", base_url, e)))?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
            page_size,
            sort,
            timeout,
        })
    }

    /// Build a client from application config / 从配置创建客户端
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.api.base_url,
            config.get_api_key(),
            config.get_page_size(),
            config.api.sort,
            config.get_request_timeout(),
        )
    }

    fn endpoint(&self, origin: DocumentOrigin) -> Result<Url, FetchError> {
        let path = match origin {
            DocumentOrigin::Blog => BLOG_PATH,
            DocumentOrigin::Cafe => CAFE_PATH,
        };
        self.base_url
            .join(path)
            .map_err(|e| FetchError::Network(format!("invalid endpoint {}: {}", path, e)))
    }

    /// Build the HTTP request for one page / 构建请求
    pub fn build_request(
        &self,
        origin: DocumentOrigin,
        query: &str,
        page: u32,
    ) -> Result<reqwest::Request, FetchError> {
        let params = SearchParams {
            query,
            page,
            size: self.page_size,
            sort: self.sort.as_str(),
        };

        let request = self
            .client
            .get(self.endpoint(origin)?)
            .header(AUTHORIZATION, format!("KakaoAK {}", self.api_key))
            .query(&params)
            .build()?;
        Ok(request)
    }

    async fn fetch(
        &self,
        origin: DocumentOrigin,
        query: &str,
        page: u32,
    ) -> Result<SearchPage, FetchError> {
        let request = self.build_request(origin, query, page)?;
        tracing::debug!("GET {} (page {})", request.url().path(), page);

        let resp = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.map_transport_error(e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.map_transport_error(e))?;

        parse_response(status, &text)
    }

    fn map_transport_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::from(e)
        }
    }
}

/// Turn a raw response into a page or an API error / 解析响应
pub fn parse_response(status: StatusCode, text: &str) -> Result<SearchPage, FetchError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrResp>(text)
            .ok()
            .filter(|err| !err.message.is_empty())
            .map(|err| err.message)
            .unwrap_or_else(|| text.chars().take(200).collect());
        return Err(FetchError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(text).map_err(|e| {
        FetchError::Parse(format!(
            "{} - {}",
            e,
            text.chars().take(200).collect::<String>()
        ))
    })
}

#[async_trait]
impl SearchClient for KakaoSearchClient {
    async fn search_blog(&self, query: &str, page: u32) -> Result<SearchPage, FetchError> {
        self.fetch(DocumentOrigin::Blog, query, page).await
    }

    async fn search_cafe(&self, query: &str, page: u32) -> Result<SearchPage, FetchError> {
        self.fetch(DocumentOrigin::Cafe, query, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> KakaoSearchClient {
        KakaoSearchClient::new(
            "https://dapi.kakao.com",
            "secret".to_string(),
            10,
            SortOrder::Recency,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_build_request_blog() {
        let req = client()
            .build_request(DocumentOrigin::Blog, "고양이 cats", 2)
            .unwrap();
        assert_eq!(req.url().path(), "/v2/search/blog");

        let pairs: Vec<(String, String)> = req
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("query".to_string(), "고양이 cats".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.contains(&("size".to_string(), "10".to_string())));
        assert!(pairs.contains(&("sort".to_string(), "recency".to_string())));

        assert_eq!(req.headers()[AUTHORIZATION], "KakaoAK secret");
    }

    #[test]
    fn test_build_request_cafe_path() {
        let req = client().build_request(DocumentOrigin::Cafe, "q", 1).unwrap();
        assert_eq!(req.url().path(), "/v2/search/cafe");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = KakaoSearchClient::new(
            "::nope",
            String::new(),
            10,
            SortOrder::Accuracy,
            Duration::from_secs(1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_response_success() {
        let body = r#"{
            "meta": {"total_count": 2, "pageable_count": 2, "is_end": true},
            "documents": [
                {"title": "a", "contents": "x", "url": "u1", "blogname": "b", "thumbnail": "", "datetime": "2020-01-01T00:00:00.000+09:00"},
                {"title": "b", "contents": "y", "url": "u2", "blogname": "b", "thumbnail": "", "datetime": "2020-01-02T00:00:00.000+09:00"}
            ]
        }"#;
        let page = parse_response(StatusCode::OK, body).unwrap();
        assert!(page.meta.is_end);
        assert_eq!(page.documents.len(), 2);
        assert_eq!(page.documents[1].url, "u2");
    }

    #[test]
    fn test_parse_response_api_error() {
        let body = r#"{"errorType": "AccessDeniedError", "message": "cannot find appKey"}"#;
        match parse_response(StatusCode::UNAUTHORIZED, body) {
            Err(FetchError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "cannot find appKey");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_response_garbage() {
        assert!(matches!(
            parse_response(StatusCode::OK, "<html>"),
            Err(FetchError::Parse(_))
        ));
    }
}
