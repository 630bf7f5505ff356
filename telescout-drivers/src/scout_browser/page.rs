use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chromiumoxide::{Browser, Page};
use rand::Rng;
use tracing::debug;

/// Harvest every anchor target on the page, dropping blanks and
/// `javascript:` no-ops. Returned in DOM order.
const LINK_HARVEST_SCRIPT: &str = r#"(() => {
    const anchorNodes = document.querySelectorAll('a');
    return Array.from(anchorNodes)
        .filter(a => a.href && a.href.trim() !== '' && !a.href.startsWith('javascript:void(0)'))
        .map(a => a.href);
})()"#;

/// Upper bound on a single navigation, load event included.
const NAV_TIMEOUT: Duration = Duration::from_secs(20);

/// Tab wrapper over the shared browser. One tab per scrape task; tabs are
/// independent, so multiple `ScoutPage`s can navigate concurrently.
pub struct ScoutPage {
    page: Page,
}

impl ScoutPage {
    /// Open a fresh blank tab on the shared browser.
    pub async fn open(browser: &Browser) -> Result<Self> {
        let page = browser
            .new_page("about:blank")
            .await
            .context("new page failed")?;
        Ok(Self { page })
    }

    /// Navigate to `url` and wait for the page to settle.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(%url, "navigating");
        tokio::time::timeout(NAV_TIMEOUT, async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, anyhow::Error>(())
        })
        .await
        .map_err(|_| anyhow!("navigation timed out: {url}"))??;

        // Results are injected client-side after the load event; give the
        // renderer a moment, with a little jitter.
        let settle = rand::thread_rng().gen_range(800..1600);
        tokio::time::sleep(Duration::from_millis(settle)).await;
        Ok(())
    }

    /// Collect every anchor href on the current page, in DOM order.
    pub async fn harvest_links(&self) -> Result<Vec<String>> {
        let value = self
            .page
            .evaluate(LINK_HARVEST_SCRIPT)
            .await
            .context("link harvest script failed")?;
        let links: Vec<String> = value
            .into_value()
            .context("link harvest returned a non-string-array value")?;
        debug!(count = links.len(), "harvested links");
        Ok(links)
    }

    /// Close the underlying tab.
    pub async fn close(self) -> Result<()> {
        self.page.close().await.context("page close failed")
    }
}
