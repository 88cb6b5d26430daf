//! Application configuration module / 应用配置模块
//!
//! Manages configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{SearchFilter, SortOrder};

/// Global configuration instance / 全局配置实例
static CONFIG: OnceCell<Arc<RwLock<AppConfig>>> = OnceCell::new();

/// Environment variable overriding `api.rest_api_key`
pub const API_KEY_ENV: &str = "KAKAO_REST_API_KEY";

/// Largest page size the search API accepts
pub const MAX_PAGE_SIZE: u32 = 50;

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote search API configuration / 搜索API配置
    #[serde(default)]
    pub api: ApiConfig,
    /// Database configuration / 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Search session configuration / 搜索会话配置
    #[serde(default)]
    pub search: SearchConfig,
}

/// Remote search API configuration / 搜索API配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API base URL / API地址
    pub base_url: String,
    /// REST API key sent as `KakaoAK <key>` / REST API 密钥
    #[serde(default)]
    pub rest_api_key: String,
    /// Documents per page / 每页文档数
    pub page_size: u32,
    /// Result ordering requested from the API / 排序方式
    #[serde(default)]
    pub sort: SortOrder,
}

/// Database configuration / 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Data directory path / 数据目录路径
    pub data_dir: String,
    /// Recent-search database file (relative to data_dir) / 最近搜索数据库文件
    pub db_file: String,
}

/// Search session configuration / 搜索会话配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Timeout applied to every remote call (seconds) / 请求超时（秒）
    pub request_timeout_secs: u64,
    /// How many recent terms are listed / 最近搜索词条数
    pub recent_limit: u32,
    /// Event channel capacity / 事件通道容量
    pub event_capacity: usize,
    /// Filter active when a session starts / 初始搜索类型
    #[serde(default)]
    pub default_filter: SearchFilter,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dapi.kakao.com".to_string(),
            rest_api_key: String::new(),
            page_size: 25,
            sort: SortOrder::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_file: "docsearch.db".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            recent_limit: 10,
            event_capacity: 256,
            default_filter: SearchFilter::default(),
        }
    }
}

impl AppConfig {
    /// Get the full database URL / 获取完整的数据库URL
    pub fn get_database_url(&self) -> String {
        let db_path = Path::new(&self.database.data_dir).join(&self.database.db_file);
        format!("sqlite:{}?mode=rwc", db_path.to_string_lossy())
    }

    /// Get the full data directory path / 获取完整的数据目录路径
    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(&self.database.data_dir)
    }

    /// API key, preferring the environment over the file / 获取API密钥
    pub fn get_api_key(&self) -> String {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| self.api.rest_api_key.clone())
    }

    /// Page size clamped to what the API accepts
    pub fn get_page_size(&self) -> u32 {
        self.api.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn get_request_timeout(&self) -> Duration {
        Duration::from_secs(self.search.request_timeout_secs.max(1))
    }

    /// Check values that would otherwise fail at request time / 校验配置
    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| format!("Invalid api.base_url '{}': {}", self.api.base_url, e))?;
        if self.search.event_capacity == 0 {
            return Err("search.event_capacity must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

/// Load configuration from an explicit path / 从指定路径加载配置
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

/// Initialize global configuration / 初始化全局配置
pub fn init_config() -> Result<Arc<RwLock<AppConfig>>, String> {
    let config = load_config()?;

    let config_arc = Arc::new(RwLock::new(config));

    CONFIG
        .set(config_arc.clone())
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(config_arc)
}

/// Get global configuration instance / 获取全局配置实例
pub fn get_config() -> Arc<RwLock<AppConfig>> {
    CONFIG
        .get_or_init(|| {
            let config = load_config().unwrap_or_default();
            Arc::new(RwLock::new(config))
        })
        .clone()
}

/// Get a read-only snapshot of current config / 获取当前配置的只读快照
pub fn config() -> AppConfig {
    get_config().read().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.default_filter, SearchFilter::All);
        assert_eq!(config.get_request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_page_size_clamped() {
        let mut config = AppConfig::default();
        config.api.page_size = 0;
        assert_eq!(config.get_page_size(), 1);
        config.api.page_size = 500;
        assert_eq!(config.get_page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_database_url() {
        let config = AppConfig::default();
        let url = config.get_database_url();
        assert!(url.starts_with("sqlite:"));
        assert!(url.ends_with("docsearch.db?mode=rwc"));
    }

    #[test]
    fn test_load_creates_default_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let created = load_config_from(&path).unwrap();
        assert!(path.exists());

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.api.base_url, created.api.base_url);
        assert_eq!(loaded.search.recent_limit, 10);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"search": {"request_timeout_secs": 3, "recent_limit": 5, "event_capacity": 16, "default_filter": "blog"}}"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.search.recent_limit, 5);
        assert_eq!(config.search.default_filter, SearchFilter::Blog);
        assert_eq!(config.api.page_size, 25);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = AppConfig::default();
        config.api.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
