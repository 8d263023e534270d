use chrono::{DateTime, Utc};

use crate::types;

/// Row of the `tweet_t` table.
#[derive(Debug, Clone)]
pub struct TweetRecord {
    pub tweet_id: uuid::Uuid,
    pub author_id: String,
    pub text: String,

    /// An empty string means the tweet has no image.
    pub(super) image_name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TweetRecord {
    pub fn image_ref(&self) -> Option<&str> {
        if self.image_name.is_empty() {
            None
        } else {
            Some(&self.image_name)
        }
    }
}

/// Maps the optional image reference to its column representation.
pub fn image_name_column(image_ref: Option<&str>) -> &str {
    image_ref.unwrap_or_default()
}

impl From<TweetRecord> for types::Tweet {
    fn from(value: TweetRecord) -> Self {
        let image_ref = value.image_ref().map(str::to_owned);
        Self {
            tweet_id: value.tweet_id,
            author_id: value.author_id.into(),
            text: value.text,
            image_ref,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
