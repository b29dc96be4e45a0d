use std::sync::Arc;

use anyhow::Result;
use optocrawl::{config::Config, crawler::Crawler, repositories::ProductRepository};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(config.database_url())
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let repository = ProductRepository::new(pool, config.products_table());
    let crawler = Crawler::new(config, Arc::new(repository.clone()));

    let summary = crawler.run().await?;

    let total = repository.count().await?;
    let without_article = repository.count_without_article().await?;
    info!(
        products_saved = summary.products_saved,
        fetch_failures = summary.fetch_failures,
        save_failures = summary.save_failures,
        stored_total = total,
        stored_without_article = without_article,
        "done"
    );

    Ok(())
}
