pub mod client;
pub mod fetch;
pub mod types;

pub use client::{ChannelHistory, HistoryError, TelegramHistory, TelegramManager};
pub use fetch::fetch_messages_from_channel;
pub use types::MessageRecord;
