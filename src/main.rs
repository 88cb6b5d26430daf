use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docsearch::aggregator::{AggregatorOptions, SearchAggregator, SearchEvent};
use docsearch::client::KakaoSearchClient;
use docsearch::config;
use docsearch::models::{Document, SearchFilter};
use docsearch::recent::SqliteRecentStore;

const HELP: &str = "\
Type a query to search. Commands:
  /all /blog /cafe   change search type
  /next              load the next page
  /recent            show recent searches
  /quit              exit";

/// One console line per document / 打印文档
fn print_documents(label: &str, documents: &[Document]) {
    println!("-- {} ({} documents)", label, documents.len());
    for doc in documents {
        let when = doc
            .timestamp
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!("[{}] {} {} <{}>", doc.origin, when, doc.title, doc.url);
    }
}

/// Render events until the aggregator goes away / 渲染事件
async fn render_events(mut rx: broadcast::Receiver<SearchEvent>) {
    loop {
        match rx.recv().await {
            Ok(SearchEvent::ReplaceResults { documents }) => print_documents("results", &documents),
            Ok(SearchEvent::AppendResults { documents }) => print_documents("more", &documents),
            Ok(SearchEvent::ShowRecent { entries }) => {
                println!("-- recent searches");
                for entry in entries {
                    println!("  {}  ({})", entry.term, entry.created_at.format("%m-%d %H:%M"));
                }
            }
            Ok(SearchEvent::FetchFailed { reason }) => println!("!! search failed: {}", reason),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Event renderer lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docsearch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    config::init_config().map_err(anyhow::Error::msg)?;
    let app_config = config::config();
    if app_config.get_api_key().is_empty() {
        tracing::warn!(
            "No API key configured; set api.rest_api_key or {}",
            config::API_KEY_ENV
        );
    }

    let store = Arc::new(SqliteRecentStore::from_config(&app_config).await?);
    let client = Arc::new(KakaoSearchClient::from_config(&app_config)?);
    let aggregator = SearchAggregator::new(
        client,
        store.clone(),
        AggregatorOptions::from_config(&app_config),
    );

    let renderer = tokio::spawn(render_events(aggregator.subscribe()));
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let outcome = match line {
            "" => continue,
            "/quit" => break,
            "/help" => {
                println!("{}", HELP);
                continue;
            }
            "/recent" => {
                if aggregator.list_recent().await.is_empty() {
                    println!("-- no recent searches");
                }
                continue;
            }
            "/next" => aggregator.request_next_page().await,
            "/all" | "/blog" | "/cafe" => {
                let filter = SearchFilter::from(&line[1..]);
                println!("-- search type: {}", filter);
                aggregator.change_filter(filter).await
            }
            query => aggregator.submit(Some(query)).await,
        };
        tracing::debug!("{:?}", outcome);
    }

    drop(aggregator);
    renderer.await?;
    store.close().await;
    tracing::info!("Bye");
    Ok(())
}
