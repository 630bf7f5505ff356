//! Thin wrapper around the MTProto client with Telescout defaults.
//!
//! Handles session persistence, username resolution, and message search,
//! translating the transport's RPC error zoo into the three outcomes the
//! fetch layer cares about.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use grammers_client::{Client, Config, InitParams, InvocationError};
use grammers_session::Session;
use tracing::debug;

use crate::telegram::types::MessageRecord;

/// Failure modes of a channel history lookup.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// The channel name does not resolve to any Telegram entity.
    #[error("channel does not exist: {0}")]
    InvalidChannel(String),
    /// The channel exists but its history is not readable.
    #[error("channel is private: {0}")]
    PrivateChannel(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Seam for channel message retrieval so the fetch and orchestration layers
/// can be exercised without a live Telegram session.
#[async_trait]
pub trait ChannelHistory: Send + Sync {
    /// Newest-first messages from `channel` whose text matches `keyword`,
    /// at most `limit` of them.
    async fn recent_matching(
        &self,
        channel: &str,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<MessageRecord>, HistoryError>;
}

/// Concrete history reader backed by a user-authorized MTProto session.
pub struct TelegramHistory {
    client: Client,
}

impl TelegramHistory {
    /// Connect using the session stored at `session_file`, creating the
    /// file when absent. The session must already be authorized; this
    /// service never drives an interactive login.
    pub async fn connect(
        api_id: i32,
        api_hash: &str,
        session_file: &Path,
    ) -> anyhow::Result<Self> {
        let session = Session::load_file_or_create(session_file)?;
        let client = Client::connect(Config {
            session,
            api_id,
            api_hash: api_hash.to_string(),
            params: InitParams::default(),
        })
        .await?;

        if !client.is_authorized().await? {
            anyhow::bail!(
                "telegram session at {} is not authorized",
                session_file.display()
            );
        }

        // The auth key negotiated during connect is only persisted on an
        // explicit save.
        client.session().save_to_file(session_file)?;

        Ok(Self { client })
    }

    fn classify(channel: &str, err: InvocationError) -> HistoryError {
        if let InvocationError::Rpc(rpc) = &err {
            if rpc.is("USERNAME_INVALID") || rpc.is("USERNAME_NOT_OCCUPIED") {
                return HistoryError::InvalidChannel(channel.to_string());
            }
            if rpc.is("CHANNEL_PRIVATE") {
                return HistoryError::PrivateChannel(channel.to_string());
            }
        }
        HistoryError::Other(err.into())
    }
}

/// Lazily-connected shared Telegram session.
///
/// The first caller pays for connect and authorization; everyone after
/// that gets the same session. Concurrent first callers block on the
/// in-flight connect rather than opening a second one, and a failed
/// connect leaves the slot empty so the next request retries.
pub struct TelegramManager {
    api_id: i32,
    api_hash: String,
    session_file: PathBuf,
    cell: tokio::sync::OnceCell<TelegramHistory>,
}

impl TelegramManager {
    pub fn new(api_id: i32, api_hash: impl Into<String>, session_file: impl Into<PathBuf>) -> Self {
        Self {
            api_id,
            api_hash: api_hash.into(),
            session_file: session_file.into(),
            cell: tokio::sync::OnceCell::new(),
        }
    }

    pub async fn get(&self) -> anyhow::Result<&TelegramHistory> {
        self.cell
            .get_or_try_init(|| {
                TelegramHistory::connect(self.api_id, &self.api_hash, &self.session_file)
            })
            .await
    }
}

#[async_trait]
impl ChannelHistory for TelegramHistory {
    async fn recent_matching(
        &self,
        channel: &str,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<MessageRecord>, HistoryError> {
        let chat = self
            .client
            .resolve_username(channel)
            .await
            .map_err(|e| Self::classify(channel, e))?
            .ok_or_else(|| HistoryError::InvalidChannel(channel.to_string()))?;

        let mut iter = self.client.search_messages(&chat).query(keyword).limit(limit);

        let mut records = Vec::new();
        while let Some(message) = iter
            .next()
            .await
            .map_err(|e| Self::classify(channel, e))?
        {
            let text = message.text();
            if text.is_empty() {
                continue;
            }
            records.push(MessageRecord {
                channel_name: channel.to_string(),
                message_id: message.id(),
                text: text.to_string(),
                date: message.date().to_rfc3339(),
            });
        }

        debug!(channel, keyword, count = records.len(), "channel history fetched");
        Ok(records)
    }
}
