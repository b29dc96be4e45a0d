//! Product persistence with reconciliation.
//!
//! A crawled product either replaces an existing stored document or is
//! inserted fresh. Matching is by article when the page had one, else by
//! title + sentinel article, narrowed by the purchase URL when present.
//! Updates overwrite the whole stored document; nothing is ever deleted
//! here.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entities::{NO_DATA, Product};

/// What a save did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Updated,
}

/// Store seam consumed by the crawl driver; mocked in driver tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn save(&self, product: &Product) -> Result<SaveOutcome>;
}

/// Which stored record counts as "the same product".
#[derive(Debug)]
enum Criterion<'a> {
    /// Article is the authoritative key when the page had one.
    Article(&'a str),
    /// No article: title plus the sentinel, narrowed by purchase URL when
    /// the offer carries one.
    TitleAndUrl {
        title: &'a str,
        purchase_url: Option<&'a str>,
    },
}

impl<'a> Criterion<'a> {
    fn for_product(product: &'a Product) -> Self {
        if product.has_article() {
            Criterion::Article(&product.article)
        } else {
            Criterion::TitleAndUrl {
                title: &product.title,
                purchase_url: product.purchase_url(),
            }
        }
    }

    /// Short identifier for log lines.
    fn log_id(&self) -> String {
        match self {
            Criterion::Article(article) => (*article).to_string(),
            Criterion::TitleAndUrl { title, .. } => {
                format!("'{}'", title.chars().take(30).collect::<String>())
            }
        }
    }
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
    table: String,
}

impl ProductRepository {
    /// `table` comes from configuration and names the products table the
    /// migration created (or a deployment-specific copy of it).
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    async fn find_id(&self, criterion: &Criterion<'_>) -> Result<Option<Uuid>> {
        let row = match criterion {
            Criterion::Article(article) => {
                let sql = format!(r#"SELECT id FROM "{}" WHERE article = $1"#, self.table);
                sqlx::query(&sql)
                    .bind(article)
                    .fetch_optional(&self.pool)
                    .await?
            }
            Criterion::TitleAndUrl {
                title,
                purchase_url: Some(purchase_url),
            } => {
                let sql = format!(
                    r#"SELECT id FROM "{}" WHERE title = $1 AND article = $2 AND purchase_url = $3"#,
                    self.table
                );
                sqlx::query(&sql)
                    .bind(title)
                    .bind(NO_DATA)
                    .bind(purchase_url)
                    .fetch_optional(&self.pool)
                    .await?
            }
            Criterion::TitleAndUrl {
                title,
                purchase_url: None,
            } => {
                let sql = format!(
                    r#"SELECT id FROM "{}" WHERE title = $1 AND article = $2"#,
                    self.table
                );
                sqlx::query(&sql)
                    .bind(title)
                    .bind(NO_DATA)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        Ok(row.map(|r| r.get("id")))
    }

    /// Total number of stored products.
    pub async fn count(&self) -> Result<i64> {
        let sql = format!(r#"SELECT COUNT(*) FROM "{}""#, self.table);
        Ok(sqlx::query_scalar(&sql).fetch_one(&self.pool).await?)
    }

    /// Number of stored products that never presented an article.
    pub async fn count_without_article(&self) -> Result<i64> {
        let sql = format!(r#"SELECT COUNT(*) FROM "{}" WHERE article = $1"#, self.table);
        Ok(sqlx::query_scalar(&sql)
            .bind(NO_DATA)
            .fetch_one(&self.pool)
            .await?)
    }

    /// Fetch a stored product document by article, for tests and tooling.
    pub async fn find_by_article(&self, article: &str) -> Result<Option<Product>> {
        let sql = format!(r#"SELECT doc FROM "{}" WHERE article = $1"#, self.table);
        let doc: Option<serde_json::Value> = sqlx::query_scalar(&sql)
            .bind(article)
            .fetch_optional(&self.pool)
            .await?;
        Ok(doc.map(serde_json::from_value).transpose()?)
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    #[instrument(skip_all, fields(article = %product.article))]
    async fn save(&self, product: &Product) -> Result<SaveOutcome> {
        let criterion = Criterion::for_product(product);
        let doc = serde_json::to_value(product)?;
        let purchase_url = product.purchase_url().unwrap_or("");

        let outcome = match self.find_id(&criterion).await? {
            Some(id) => {
                let sql = format!(
                    r#"UPDATE "{}"
                       SET article = $2, title = $3, purchase_url = $4, doc = $5,
                           updated_at = now()
                       WHERE id = $1"#,
                    self.table
                );
                sqlx::query(&sql)
                    .bind(id)
                    .bind(&product.article)
                    .bind(&product.title)
                    .bind(purchase_url)
                    .bind(&doc)
                    .execute(&self.pool)
                    .await?;
                SaveOutcome::Updated
            }
            None => {
                let sql = format!(
                    r#"INSERT INTO "{}" (article, title, purchase_url, doc, created_at)
                       VALUES ($1, $2, $3, $4, $5)"#,
                    self.table
                );
                sqlx::query(&sql)
                    .bind(&product.article)
                    .bind(&product.title)
                    .bind(purchase_url)
                    .bind(&doc)
                    .bind(product.created_at)
                    .execute(&self.pool)
                    .await?;
                SaveOutcome::Inserted
            }
        };

        match outcome {
            SaveOutcome::Updated => info!(id = %criterion.log_id(), "updated"),
            SaveOutcome::Inserted => info!(id = %criterion.log_id(), "saved"),
        }
        Ok(outcome)
    }
}
