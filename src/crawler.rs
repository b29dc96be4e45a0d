//! The crawl driver: categories → listing pages → product pages → store.
//!
//! Every per-page and per-write failure is logged and skipped so that one
//! bad page or transient store error never aborts a multi-thousand-product
//! crawl. Product pages are fetched under a bounded semaphore; extractors
//! and saves run inside the same task.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{Instrument, error, info, info_span, warn};
use url::Url;

use crate::config::Config;
use crate::discovery;
use crate::extractor::parse_product;
use crate::fetcher::fetch;
use crate::repositories::ProductStore;

/// Tally of one crawl run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    pub categories: usize,
    pub listing_pages: usize,
    pub products_seen: usize,
    pub products_saved: usize,
    pub fetch_failures: usize,
    pub save_failures: usize,
}

/// Outcome of one product URL. Failures carry no payload: they have
/// already been logged where they happened.
enum ProductOutcome {
    Saved,
    FetchFailed,
    SaveFailed,
}

pub struct Crawler<S> {
    config: Config,
    store: Arc<S>,
}

impl<S: ProductStore + 'static> Crawler<S> {
    pub fn new(config: Config, store: Arc<S>) -> Self {
        Self { config, store }
    }

    /// Crawl the whole catalog once. Only an unreachable start page (or an
    /// invalid base URL) fails the run; everything below that boundary is
    /// log-and-continue.
    pub async fn run(&self) -> Result<CrawlSummary> {
        let base_url = Url::parse(self.config.base_url())?;
        let semaphore = Arc::new(Semaphore::new(self.config.crawl_concurrency()));
        let mut summary = CrawlSummary::default();

        info!(base_url = %base_url, "starting crawl");

        let start_page = fetch(base_url.as_str()).await?;
        let categories = discovery::category_links(&start_page.body_utf8, &base_url);
        summary.categories = categories.len();

        for category_url in categories {
            self.crawl_category(&category_url, &base_url, &semaphore, &mut summary)
                .instrument(info_span!("category", url = %category_url))
                .await;
        }

        info!(
            products_seen = summary.products_seen,
            products_saved = summary.products_saved,
            fetch_failures = summary.fetch_failures,
            save_failures = summary.save_failures,
            "crawl finished"
        );
        Ok(summary)
    }

    async fn crawl_category(
        &self,
        category_url: &Url,
        base_url: &Url,
        semaphore: &Arc<Semaphore>,
        summary: &mut CrawlSummary,
    ) {
        let category_page = match fetch(category_url.as_str()).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %category_url, error = %e, "failed to fetch category, skipping");
                summary.fetch_failures += 1;
                return;
            }
        };

        let page_count = discovery::page_count(&category_page.body_utf8);
        for page_url in discovery::page_links(category_url, page_count) {
            let listing = match fetch(page_url.as_str()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(url = %page_url, error = %e, "failed to fetch listing page, skipping");
                    summary.fetch_failures += 1;
                    continue;
                }
            };
            summary.listing_pages += 1;

            let product_urls = discovery::product_links(&listing.body_utf8, base_url);
            summary.products_seen += product_urls.len();

            let mut tasks: JoinSet<ProductOutcome> = JoinSet::new();
            for product_url in product_urls {
                let store = self.store.clone();
                let semaphore = semaphore.clone();
                tasks.spawn(
                    async move {
                        // Closed only on shutdown, which this crawl never does.
                        let _permit = semaphore.acquire_owned().await.expect("semaphore open");
                        crawl_product(&product_url, store.as_ref()).await
                    }
                    .instrument(info_span!("product")),
                );
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(ProductOutcome::Saved) => summary.products_saved += 1,
                    Ok(ProductOutcome::FetchFailed) => summary.fetch_failures += 1,
                    Ok(ProductOutcome::SaveFailed) => summary.save_failures += 1,
                    Err(e) => {
                        error!(error = %e, "product task panicked");
                        summary.save_failures += 1;
                    }
                }
            }
        }
    }
}

/// Fetch, extract, save one product page. A fetch failure means no
/// product and no store write; a store failure loses only this product.
async fn crawl_product<S: ProductStore>(url: &Url, store: &S) -> ProductOutcome {
    let page = match fetch(url.as_str()).await {
        Ok(page) => page,
        Err(e) => {
            warn!(
                url = %url,
                error = %e,
                transient = e.should_retry(),
                "failed to fetch product page"
            );
            return ProductOutcome::FetchFailed;
        }
    };

    let product = parse_product(&page);

    match store.save(&product).await {
        Ok(_) => ProductOutcome::Saved,
        Err(e) => {
            error!(url = %url, error = %e, "failed to save product, continuing");
            ProductOutcome::SaveFailed
        }
    }
}
