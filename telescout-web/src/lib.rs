//! Web discovery utilities: search-results scraping and channel extraction.
//!
//! - Search-results page scraping and link aggregation (`serp`)
//! - Channel-name extraction passes over harvested links (`extract`)
//! - Candidate resolution with query shaping and denylist filtering
//!   (`resolver`)

pub mod extract;
pub mod resolver;
pub mod serp;
