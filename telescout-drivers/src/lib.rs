//! Driver layer for headless-browser automation.
//!
//! This crate exposes the shared browser session and the page helpers used
//! to collect links from rendered search-results pages.
//!
//! - [`scout_browser::driver::BrowserManager`]: lazily-launched, process-wide
//!   Chromium instance shared by all scrape tasks
//! - [`scout_browser::page::ScoutPage`]: tab wrapper with navigation and
//!   anchor harvesting
pub mod scout_browser;
