//! SQLite recent search store / SQLite 最近搜索存储
//!
//! One table, one row per distinct term. Re-inserting a term deletes the old
//! row first so `id` order is recency order.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use super::RecentSearchStore;
use crate::config::AppConfig;
use crate::error::StoreError;
use crate::models::RecentSearchEntry;

/// Recent search store backed by SQLite
pub struct SqliteRecentStore {
    db: Pool<Sqlite>,
    limit: u32,
}

impl SqliteRecentStore {
    /// Open (or create) the database at `database_url` / 打开数据库
    pub async fn connect(database_url: &str, limit: u32) -> Result<Self, StoreError> {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;

        // WAL mode for concurrent readers
        sqlx::query("PRAGMA journal_mode=WAL").execute(&db).await?;
        sqlx::query("PRAGMA busy_timeout=5000").execute(&db).await?;

        run_migrations(&db).await?;
        tracing::info!("Recent search database ready: {}", database_url);

        Ok(Self { db, limit })
    }

    /// Open the database described by the config, creating the data dir / 按配置打开数据库
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let data_dir = config.get_data_dir();
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)?;
            tracing::info!("Created data directory: {:?}", data_dir);
        }

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| config.get_database_url());
        Self::connect(&database_url, config.search.recent_limit).await
    }

    /// Remove every stored term / 清空最近搜索
    pub async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM recent_search_words")
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }

    /// 关闭数据库连接池 / Close database connection pool
    pub async fn close(&self) {
        self.db.close().await;
    }
}

/// Create the recent search table / 创建最近搜索表
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS recent_search_words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[async_trait]
impl RecentSearchStore for SqliteRecentStore {
    async fn insert(&self, term: &str, created_at: DateTime<Utc>) -> Result<(), StoreError> {
        let created_at = created_at.to_rfc3339_opts(SecondsFormat::Micros, true);

        let mut tx = self.db.begin().await?;
        sqlx::query("DELETE FROM recent_search_words WHERE word = ?")
            .bind(term)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO recent_search_words (word, created_at) VALUES (?, ?)")
            .bind(term)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    async fn list_recent(&self) -> Result<Vec<RecentSearchEntry>, StoreError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT word, created_at FROM recent_search_words ORDER BY id DESC LIMIT ?",
        )
        .bind(self.limit as i64)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|(term, created_at)| -> Result<RecentSearchEntry, StoreError> {
                let created_at = DateTime::parse_from_rfc3339(&created_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| StoreError::Timestamp(created_at.clone()))?;
                Ok(RecentSearchEntry { term, created_at })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn open(dir: &tempfile::TempDir, limit: u32) -> SqliteRecentStore {
        let path = dir.path().join("recent.db");
        let url = format!("sqlite:{}?mode=rwc", path.to_string_lossy());
        SqliteRecentStore::connect(&url, limit).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir, 10).await;
        assert!(store.list_recent().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_then_list_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir, 10).await;
        let t0 = Utc::now();

        store.insert("cats", t0).await.unwrap();
        store.insert("dogs", t0 + Duration::seconds(1)).await.unwrap();
        store.insert("birds", t0 + Duration::seconds(2)).await.unwrap();

        let listed = store.list_recent().await.unwrap();
        let terms: Vec<&str> = listed.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["birds", "dogs", "cats"]);
        assert_eq!(
            listed[2].created_at.timestamp_micros(),
            t0.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_resubmitted_term_moves_to_front() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir, 10).await;
        let now = Utc::now();

        store.insert("cats", now).await.unwrap();
        store.insert("dogs", now).await.unwrap();
        store.insert("cats", now).await.unwrap();

        let terms: Vec<String> = store
            .list_recent()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.term)
            .collect();
        assert_eq!(terms, vec!["cats", "dogs"]);
    }

    #[tokio::test]
    async fn test_limit_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir, 2).await;
        for term in ["a", "b", "c"] {
            store.insert(term, Utc::now()).await.unwrap();
        }

        let listed = store.list_recent().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].term, "c");

        assert_eq!(store.clear().await.unwrap(), 3);
        assert!(store.list_recent().await.unwrap().is_empty());
        store.close().await;
    }

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = open(&dir, 10).await;
            store.insert("persisted", Utc::now()).await.unwrap();
            store.close().await;
        }
        let store = open(&dir, 10).await;
        let listed = store.list_recent().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].term, "persisted");
    }
}
