//! Candidate-channel resolution: query shaping, link scraping, extraction,
//! and denylist filtering.

use std::sync::Arc;

use telescout_common::Denylist;
use tracing::{info, warn};

use crate::extract;
use crate::serp::{DEFAULT_NUM_PAGES, LinkScraper};

/// Query issued when the search looks like free text: intersect with
/// compromise/leak clauses and push aggregator noise out of the results.
fn narrowed_query(query: &str) -> String {
    format!(
        r#""{query}" AND ("malware" OR "c2") AND ("hack" OR "trojan" OR "leak" OR "stealer") -telegraph -news"#
    )
}

/// Numeric-looking queries usually name an ID rather than free text, and
/// narrowing those over-constrains the search. Any digit, ASCII or not,
/// selects the raw query.
fn select_query(query: &str) -> String {
    if query.chars().any(char::is_numeric) {
        query.to_string()
    } else {
        narrowed_query(query)
    }
}

/// Resolves a free-text query into candidate channel names.
pub struct ChannelResolver {
    scraper: Arc<dyn LinkScraper>,
    denylist: Denylist,
    num_pages: u32,
}

impl ChannelResolver {
    pub fn new(scraper: Arc<dyn LinkScraper>, denylist: Denylist) -> Self {
        Self {
            scraper,
            denylist,
            num_pages: DEFAULT_NUM_PAGES,
        }
    }

    pub fn with_num_pages(mut self, num_pages: u32) -> Self {
        self.num_pages = num_pages.max(1);
        self
    }

    /// Resolve candidates for `query`.
    ///
    /// Never fails: any error in the scrape/extract chain degrades to an
    /// empty candidate list, since a hard failure here would take the whole
    /// request down for what is a best-effort discovery step.
    pub async fn resolve(&self, query: &str) -> Vec<String> {
        match self.try_resolve(query).await {
            Ok(channels) => channels,
            Err(e) => {
                warn!(%query, error = %e, "channel resolution failed, returning no candidates");
                Vec::new()
            }
        }
    }

    async fn try_resolve(&self, query: &str) -> anyhow::Result<Vec<String>> {
        let effective = select_query(query);
        let links = self.scraper.scrape_links(&effective, self.num_pages).await?;

        let names = extract::extract_channel_names(&links);
        let total = names.len();
        let channels: Vec<String> = names
            .into_iter()
            .filter(|name| !self.denylist.contains(name))
            .collect();

        info!(
            %query,
            harvested = links.len(),
            extracted = total,
            resolved = channels.len(),
            "resolved candidate channels"
        );
        Ok(channels)
    }
}
