//! Per-channel fetch step: one bounded, failure-isolated history lookup.

use std::time::Duration;

use telescout_common::Denylist;
use tracing::{info, warn};

use crate::telegram::client::{ChannelHistory, HistoryError};
use crate::telegram::types::MessageRecord;

/// Upper bound on a single channel lookup. Slow or wedged channels must not
/// hold the whole request hostage.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch recent keyword-matching messages from one channel.
///
/// Infallible by contract: every failure mode degrades to an empty list and
/// puts the channel on the denylist so later requests skip it. Invalid and
/// private channels stay invalid; timeouts and transport errors are treated
/// the same way since retrying them inline would stall the fan-out.
pub async fn fetch_messages_from_channel(
    history: &dyn ChannelHistory,
    denylist: &Denylist,
    channel: &str,
    keyword: &str,
    limit: usize,
) -> Vec<MessageRecord> {
    let outcome = tokio::time::timeout(
        FETCH_TIMEOUT,
        history.recent_matching(channel, keyword, limit),
    )
    .await;

    let err = match outcome {
        Ok(Ok(records)) => {
            info!(channel, count = records.len(), "fetched channel messages");
            return records;
        }
        Ok(Err(e)) => e,
        Err(_) => HistoryError::Other(anyhow::anyhow!(
            "channel fetch timed out after {}s",
            FETCH_TIMEOUT.as_secs()
        )),
    };

    match &err {
        HistoryError::InvalidChannel(_) | HistoryError::PrivateChannel(_) => {
            warn!(channel, error = %err, "channel unusable, adding to denylist");
        }
        HistoryError::Other(_) => {
            warn!(channel, error = %err, "channel fetch failed, adding to denylist");
        }
    }
    denylist.insert(channel);
    Vec::new()
}
