use anyhow::{anyhow, Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Launch options for the shared Chromium instance.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Explicit Chrome/Chromium binary path. `None` lets chromiumoxide
    /// discover an installed browser.
    pub chrome_bin: Option<String>,
    pub headless: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            chrome_bin: None,
            headless: true,
        }
    }
}

/// Chromium command-line arguments applied to every launch.
pub fn build_launch_args() -> Vec<&'static str> {
    vec![
        "--no-sandbox",
        "--disable-setuid-sandbox",
        "--disable-extensions",
        "--disable-infobars",
        "--disable-notifications",
        "--disable-dev-shm-usage",
    ]
}

/// Owns the single process-wide browser instance.
///
/// The browser is launched lazily on first demand; the `OnceCell` guards
/// the check-and-create sequence, so concurrent first callers block on the
/// in-flight launch instead of racing a second one, and every caller
/// observes the same handle afterwards. A failed launch propagates to the
/// caller and leaves the cell empty.
pub struct BrowserManager {
    options: BrowserOptions,
    cell: OnceCell<Browser>,
}

impl BrowserManager {
    pub fn new(options: BrowserOptions) -> Self {
        Self {
            options,
            cell: OnceCell::new(),
        }
    }

    /// Return the shared browser, launching it if this is the first call.
    pub async fn get(&self) -> Result<&Browser> {
        init_once(&self.cell, || launch(&self.options)).await
    }
}

/// Runs `launch` at most once per cell: concurrent callers block on the
/// in-flight launch and observe the same value, and a failed launch leaves
/// the cell empty so the next caller retries.
async fn init_once<T, F, Fut>(cell: &OnceCell<T>, launch: F) -> Result<&T>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    cell.get_or_try_init(launch).await
}

async fn launch(options: &BrowserOptions) -> Result<Browser> {
    info!(headless = options.headless, "launching browser");

    let mut builder = BrowserConfig::builder();
    for arg in build_launch_args() {
        builder = builder.arg(arg);
    }
    if let Some(bin) = &options.chrome_bin {
        builder = builder.chrome_executable(bin);
    }
    if !options.headless {
        builder = builder.with_head();
    }
    let config = builder
        .build()
        .map_err(|e| anyhow!("browser config: {e}"))?;

    let (browser, mut handler) = Browser::launch(config)
        .await
        .context("browser launch failed")?;

    // The handler drives the CDP connection and must be polled for the
    // browser to make progress.
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                warn!(error = %e, "browser handler stopped");
                break;
            }
        }
    });

    info!("browser launched");
    Ok(browser)
}
