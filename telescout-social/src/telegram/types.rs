use serde::{Deserialize, Serialize};

/// One matched channel message, flattened for the response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub channel_name: String,
    pub message_id: i32,
    pub text: String,
    /// RFC 3339 timestamp of the message, UTC.
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_flat_field_names() {
        let record = MessageRecord {
            channel_name: "leakfeed".into(),
            message_id: 42,
            text: "fresh dump".into(),
            date: "2024-06-01T12:00:00+00:00".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["channel_name"], "leakfeed");
        assert_eq!(json["message_id"], 42);
        assert_eq!(json["text"], "fresh dump");
        assert_eq!(json["date"], "2024-06-01T12:00:00+00:00");
    }
}
