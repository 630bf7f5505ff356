//! Runtime denylist of Telegram channel names.
//!
//! Seeded at process start with channels known to be dead, private, or
//! otherwise unfetchable, and grown whenever a fetch against a channel
//! fails. Lives for the process lifetime; never persisted or shrunk.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// Channels that repeatedly fail resolution or fetching. Kept verbatim so
/// known-bad candidates are skipped from the first request onward.
const SEED_CHANNELS: &[&str] = &[
    "snatch_team",
    "spmias",
    "lbbotnews",
    "MEzZKwya_dg4ODM1",
    "x_legacy",
    "S0D",
    "ck_nt",
    "ZLcOzVBENZg2ZWRl",
    "sipvoip",
    "thehydramarket",
    "durov",
    "mrrobothackingstuff",
    "zerodaylaz",
    "worlddoctorsalliance",
    "AAAAAE1eCVFTLGzOhkU",
    "AAAAAEyTZ0JoovFxE",
    "deepdatamarket",
    "thevirusss",
    "loljsjsjsjssh",
    "6miLWkw70RxjYmE0",
    "ykoIXVJBirI0NzU0",
    "m4nifest0",
    "GvfPnZMWZEMyMDFl",
    "XLi5D7RLLTBmMjM1",
    "cybertrickszone",
];

/// Shared, grow-only set of channel names excluded from candidate
/// resolution and message fetching.
///
/// Cloning is cheap; all clones observe the same underlying set.
#[derive(Debug, Clone)]
pub struct Denylist {
    inner: Arc<RwLock<HashSet<String>>>,
}

impl Denylist {
    /// Create a denylist pre-populated with the built-in seed entries.
    pub fn seeded() -> Self {
        Self::from_iter(SEED_CHANNELS.iter().map(|s| s.to_string()))
    }

    /// Create an empty denylist. Mostly useful in tests.
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    pub fn from_iter<I: IntoIterator<Item = String>>(entries: I) -> Self {
        Self {
            inner: Arc::new(RwLock::new(entries.into_iter().collect())),
        }
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.inner
            .read()
            .expect("denylist lock poisoned")
            .contains(channel)
    }

    /// Record a channel as bad. Returns `true` if it was newly inserted.
    pub fn insert(&self, channel: &str) -> bool {
        self.inner
            .write()
            .expect("denylist lock poisoned")
            .insert(channel.to_string())
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("denylist lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
