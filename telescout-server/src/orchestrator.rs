//! End-to-end retrieval pipeline: resolve candidate channels, fan out one
//! fetch per channel, aggregate the matches.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use telescout_common::Denylist;
use telescout_social::telegram::{
    ChannelHistory, MessageRecord, TelegramManager, fetch_messages_from_channel,
};
use telescout_web::resolver::ChannelResolver;
use tracing::info;

pub const DEFAULT_MESSAGE_LIMIT: usize = 5;

/// Hands out the shared channel-history session. Session establishment is
/// the one failure in the pipeline that is not recovered per channel; it
/// surfaces to the HTTP layer as an internal error.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn history(&self) -> Result<&dyn ChannelHistory>;
}

#[async_trait]
impl HistorySource for TelegramManager {
    async fn history(&self) -> Result<&dyn ChannelHistory> {
        Ok(self.get().await? as &dyn ChannelHistory)
    }
}

pub struct Orchestrator {
    resolver: ChannelResolver,
    history: Arc<dyn HistorySource>,
    denylist: Denylist,
    message_limit: usize,
}

impl Orchestrator {
    /// `denylist` must be the same handle the resolver filters against, so
    /// channels denylisted by failed fetches disappear from later
    /// resolutions.
    pub fn new(
        resolver: ChannelResolver,
        history: Arc<dyn HistorySource>,
        denylist: Denylist,
    ) -> Self {
        Self {
            resolver,
            history,
            denylist,
            message_limit: DEFAULT_MESSAGE_LIMIT,
        }
    }

    pub fn with_message_limit(mut self, limit: usize) -> Self {
        self.message_limit = limit.max(1);
        self
    }

    /// Retrieve recent messages matching `query` across every candidate
    /// channel the query resolves to.
    ///
    /// Per-channel failures are absorbed by the fetch layer; the aggregate
    /// reflects completion order, not request order.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<MessageRecord>> {
        let channels = self.resolver.resolve(query).await;
        if channels.is_empty() {
            info!(%query, "no candidate channels, skipping message fetch");
            return Ok(Vec::new());
        }

        let history = self.history.history().await?;

        let mut fetches: FuturesUnordered<_> = channels
            .iter()
            .map(|channel| {
                fetch_messages_from_channel(
                    history,
                    &self.denylist,
                    channel,
                    query,
                    self.message_limit,
                )
            })
            .collect();

        let mut records = Vec::new();
        while let Some(batch) = fetches.next().await {
            records.extend(batch);
        }

        info!(
            %query,
            channels = channels.len(),
            messages = records.len(),
            "retrieval complete"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use telescout_social::telegram::HistoryError;
    use telescout_web::serp::LinkScraper;

    struct FakeScraper {
        links: Vec<String>,
    }

    #[async_trait]
    impl LinkScraper for FakeScraper {
        async fn scrape_links(&self, _query: &str, _num_pages: u32) -> Result<Vec<String>> {
            Ok(self.links.clone())
        }
    }

    fn preview_links(channels: &[&str]) -> Vec<String> {
        channels
            .iter()
            .map(|name| format!("https://t.me/s/{name}"))
            .collect()
    }

    enum Canned {
        Messages(Vec<MessageRecord>),
        Invalid,
        Private,
    }

    struct FakeHistory {
        channels: HashMap<String, Canned>,
        queried: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChannelHistory for FakeHistory {
        async fn recent_matching(
            &self,
            channel: &str,
            _keyword: &str,
            _limit: usize,
        ) -> Result<Vec<MessageRecord>, HistoryError> {
            self.queried.lock().unwrap().push(channel.to_string());
            match self.channels.get(channel) {
                Some(Canned::Messages(records)) => Ok(records.clone()),
                Some(Canned::Private) => {
                    Err(HistoryError::PrivateChannel(channel.to_string()))
                }
                _ => Err(HistoryError::InvalidChannel(channel.to_string())),
            }
        }
    }

    struct FakeSource {
        inner: FakeHistory,
    }

    #[async_trait]
    impl HistorySource for FakeSource {
        async fn history(&self) -> Result<&dyn ChannelHistory> {
            Ok(&self.inner)
        }
    }

    struct DeadSource;

    #[async_trait]
    impl HistorySource for DeadSource {
        async fn history(&self) -> Result<&dyn ChannelHistory> {
            Err(anyhow!("session not authorized"))
        }
    }

    fn record(channel: &str, id: i32, text: &str) -> MessageRecord {
        MessageRecord {
            channel_name: channel.to_string(),
            message_id: id,
            text: text.to_string(),
            date: "2024-06-01T12:00:00+00:00".to_string(),
        }
    }

    fn orchestrator_with(
        channels: &[&str],
        history: Vec<(&str, Canned)>,
        denylist: Denylist,
    ) -> (Orchestrator, Arc<FakeSource>) {
        let scraper = Arc::new(FakeScraper {
            links: preview_links(channels),
        });
        let resolver = ChannelResolver::new(scraper, denylist.clone());
        let source = Arc::new(FakeSource {
            inner: FakeHistory {
                channels: history
                    .into_iter()
                    .map(|(name, canned)| (name.to_string(), canned))
                    .collect(),
                queried: Mutex::new(Vec::new()),
            },
        });
        let orchestrator = Orchestrator::new(resolver, source.clone(), denylist);
        (orchestrator, source)
    }

    #[tokio::test]
    async fn aggregates_messages_across_channels() {
        let (orchestrator, _) = orchestrator_with(
            &["alpha", "beta"],
            vec![
                (
                    "alpha",
                    Canned::Messages(vec![
                        record("alpha", 1, "first hit"),
                        record("alpha", 2, "second hit"),
                    ]),
                ),
                ("beta", Canned::Messages(vec![record("beta", 9, "only hit")])),
            ],
            Denylist::empty(),
        );

        let mut records = orchestrator.retrieve("acme").await.unwrap();
        records.sort_by_key(|r| (r.channel_name.clone(), r.message_id));

        assert_eq!(
            records,
            vec![
                record("alpha", 1, "first hit"),
                record("alpha", 2, "second hit"),
                record("beta", 9, "only hit"),
            ]
        );
    }

    #[tokio::test]
    async fn failed_channel_does_not_abort_siblings() {
        let denylist = Denylist::empty();
        let (orchestrator, _) = orchestrator_with(
            &["alpha", "ghost"],
            vec![(
                "alpha",
                Canned::Messages(vec![record("alpha", 1, "survivor")]),
            )],
            denylist.clone(),
        );

        let records = orchestrator.retrieve("acme").await.unwrap();

        assert_eq!(records, vec![record("alpha", 1, "survivor")]);
        assert!(denylist.contains("ghost"));
    }

    #[tokio::test]
    async fn only_the_succeeding_channel_contributes_and_failures_are_denylisted() {
        let denylist = Denylist::empty();
        let (orchestrator, _) = orchestrator_with(
            &["ghost", "vault", "alpha"],
            vec![
                ("ghost", Canned::Invalid),
                ("vault", Canned::Private),
                (
                    "alpha",
                    Canned::Messages(vec![
                        record("alpha", 1, "first"),
                        record("alpha", 2, "second"),
                    ]),
                ),
            ],
            denylist.clone(),
        );

        let mut records = orchestrator.retrieve("acme").await.unwrap();
        records.sort_by_key(|r| r.message_id);

        assert_eq!(
            records,
            vec![record("alpha", 1, "first"), record("alpha", 2, "second")]
        );
        assert!(denylist.contains("ghost"));
        assert!(denylist.contains("vault"));
        assert!(!denylist.contains("alpha"));
    }

    #[tokio::test]
    async fn denylisted_channel_is_skipped_on_later_retrievals() {
        let denylist = Denylist::empty();
        let (orchestrator, source) = orchestrator_with(
            &["alpha", "ghost"],
            vec![(
                "alpha",
                Canned::Messages(vec![record("alpha", 1, "hit")]),
            )],
            denylist.clone(),
        );

        orchestrator.retrieve("acme").await.unwrap();
        orchestrator.retrieve("acme").await.unwrap();

        let queried = source.inner.queried.lock().unwrap().clone();
        // First pass queries both; the second only the surviving channel.
        assert_eq!(
            queried.iter().filter(|c| c.as_str() == "ghost").count(),
            1
        );
        assert_eq!(
            queried.iter().filter(|c| c.as_str() == "alpha").count(),
            2
        );
    }

    #[tokio::test]
    async fn session_failure_surfaces_as_error() {
        let scraper = Arc::new(FakeScraper {
            links: preview_links(&["alpha"]),
        });
        let resolver = ChannelResolver::new(scraper, Denylist::empty());
        let orchestrator =
            Orchestrator::new(resolver, Arc::new(DeadSource), Denylist::empty());

        assert!(orchestrator.retrieve("acme").await.is_err());
    }

    #[tokio::test]
    async fn no_candidates_never_touches_the_session() {
        let scraper = Arc::new(FakeScraper { links: Vec::new() });
        let resolver = ChannelResolver::new(scraper, Denylist::empty());
        let orchestrator =
            Orchestrator::new(resolver, Arc::new(DeadSource), Denylist::empty());

        let records = orchestrator.retrieve("acme").await.unwrap();
        assert!(records.is_empty());
    }
}
