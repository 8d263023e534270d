use serde::{Deserialize, Serialize};

use super::UserId;

/// Notification type tag carried by new tweet messages.
pub const NEW_TWEET_NOTIFICATION_TYPE: &str = "tweet";

/// Fire-and-forget message emitted when a tweet is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTweetNotification {
    pub sender_id: UserId,
    #[serde(rename = "type")]
    pub notification_type: String,
}

impl NewTweetNotification {
    pub fn new(sender_id: UserId) -> Self {
        Self {
            sender_id,
            notification_type: NEW_TWEET_NOTIFICATION_TYPE.to_owned(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
