//! Search-results page scraping against the programmable search engine.
//!
//! One tab per result page, all pages of a query scraped concurrently on
//! the shared browser, flattened into a single link sequence that preserves
//! page order and, within a page, DOM order.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chromiumoxide::Browser;
use futures::future::try_join_all;
use telescout_drivers::scout_browser::{BrowserManager, ScoutPage};
use tracing::{debug, warn};

const CSE_BASE: &str = "https://cse.google.com/cse?&cx=006368593537057042503:efxu7xprihg";

pub const DEFAULT_NUM_PAGES: u32 = 2;

/// Build the results URL for one page of a query, sorted newest-first.
pub fn search_url(query: &str, page_index: u32) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{CSE_BASE}#gsc.tab=0&gsc.q={encoded}&gsc.sort=date&gsc.page={page_index}")
}

/// Scrape one results page: open a tab, navigate, harvest every anchor
/// target, close the tab. The tab is closed even when the harvest fails.
pub async fn scrape_page(browser: &Browser, query: &str, page_index: u32) -> Result<Vec<String>> {
    let url = search_url(query, page_index);
    let page = ScoutPage::open(browser).await?;

    let harvested = async {
        page.goto(&url).await?;
        page.harvest_links().await
    }
    .await;

    if let Err(e) = page.close().await {
        warn!(page_index, error = %e, "failed to close scrape tab");
    }

    let links = harvested?;
    debug!(page_index, count = links.len(), "scraped results page");
    Ok(links)
}

/// Seam for the link-aggregation step so the resolver can be exercised
/// without a live browser.
#[async_trait]
pub trait LinkScraper: Send + Sync {
    async fn scrape_links(&self, query: &str, num_pages: u32) -> Result<Vec<String>>;
}

/// Concrete scraper backed by the shared Chromium session.
pub struct CseLinkScraper {
    manager: Arc<BrowserManager>,
}

impl CseLinkScraper {
    pub fn new(manager: Arc<BrowserManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl LinkScraper for CseLinkScraper {
    async fn scrape_links(&self, query: &str, num_pages: u32) -> Result<Vec<String>> {
        let browser = self.manager.get().await?;

        // All-or-nothing: a single failed page aborts the whole
        // aggregation. The resolver above degrades that to "no candidates",
        // so it never reaches the client as an error.
        let tasks = (1..=num_pages).map(|page_index| scrape_page(browser, query, page_index));
        let per_page = try_join_all(tasks).await?;

        Ok(per_page.into_iter().flatten().collect())
    }
}
