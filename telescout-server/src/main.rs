use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use telescout_common::Denylist;
use telescout_common::observability::{LogConfig, LogFormat, init_logging};
use telescout_config::{ScoutConfig, ScoutConfigLoader};
use telescout_drivers::scout_browser::{BrowserManager, BrowserOptions};
use telescout_social::telegram::TelegramManager;
use telescout_web::resolver::ChannelResolver;
use telescout_web::serp::CseLinkScraper;

mod orchestrator;
mod routes;

use orchestrator::Orchestrator;
use routes::AppState;

#[derive(Parser)]
#[command(
    name = "telescout-server",
    about = "Telegram channel discovery and message retrieval service"
)]
struct Cli {
    /// Path to the YAML config file
    #[arg(long, default_value = "telescout.yaml")]
    config: PathBuf,
    /// Override the configured listen port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg: ScoutConfig = ScoutConfigLoader::new().with_file(&cli.config).load()?;

    let format = match cfg.logging.format.as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    };
    init_logging(LogConfig {
        log_dir: cfg.logging.dir.clone().map(PathBuf::from),
        emit_stderr: cfg.logging.stderr,
        format,
        ..LogConfig::default()
    })?;

    // One denylist handle for the whole process: the resolver filters on it
    // and failed fetches grow it.
    let denylist = Denylist::seeded();

    let browser = Arc::new(BrowserManager::new(BrowserOptions {
        chrome_bin: cfg.browser.chrome_bin.clone(),
        headless: cfg.browser.headless,
    }));
    let scraper = Arc::new(CseLinkScraper::new(browser));
    let resolver =
        ChannelResolver::new(scraper, denylist.clone()).with_num_pages(cfg.search.pages);

    let telegram = Arc::new(TelegramManager::new(
        cfg.telegram.api_id,
        cfg.telegram.api_hash.clone(),
        cfg.telegram.session_file.clone(),
    ));

    let orchestrator = Orchestrator::new(resolver, telegram, denylist)
        .with_message_limit(cfg.search.message_limit);

    let app = routes::build_router(Arc::new(AppState { orchestrator }));

    let port = cli.port.unwrap_or(cfg.server.port);
    let addr = format!("{}:{}", cfg.server.host, port);
    tracing::info!(%addr, "starting telescout server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
