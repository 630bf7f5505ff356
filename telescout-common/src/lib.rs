//! Shared types and observability helpers for the Telescout workspace.
//!
//! - [`Denylist`]: process-wide set of channel names excluded from
//!   resolution and fetching
//! - [`observability`]: centralised tracing setup with a rolling file sink

pub mod denylist;
pub mod observability;

pub use denylist::Denylist;
