use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cursor;

/// Tweet identifier, assigned by the durable store at creation time.
pub type TweetId = uuid::Uuid;

/// Opaque identifier of the user owning a tweet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub tweet_id: TweetId,
    pub author_id: UserId,
    pub text: String,
    /// Name of the attached blob in the object store, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tweet {
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author_id == user
    }

    /// Position of this tweet in the `(created_at, tweet_id)` order.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.created_at, self.tweet_id)
    }
}

/// Image payload supplied on create or update.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Object name the image is stored under, this is also the tweet image reference.
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Image read back from the object store.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlob {
    pub bytes: Bytes,
    pub content_type: String,
}

#[derive(Debug, Clone)]
pub struct NewTweet {
    pub author_id: UserId,
    pub text: String,
    pub image: Option<ImageUpload>,
}

impl NewTweet {
    pub fn new(author_id: impl Into<UserId>, text: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }
}

/// Mutation requested by `user_id` over an existing tweet.
#[derive(Debug, Clone)]
pub struct TweetEdit {
    pub tweet_id: TweetId,
    pub user_id: UserId,
    pub text: String,
    pub image: Option<ImageUpload>,
}

impl TweetEdit {
    pub fn new(tweet_id: TweetId, user_id: impl Into<UserId>, text: impl Into<String>) -> Self {
        Self {
            tweet_id,
            user_id: user_id.into(),
            text: text.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }
}

/// A single listing page. An empty `next_cursor` marks the end of the stream.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TweetPage {
    pub tweets: Vec<Tweet>,
    pub next_cursor: String,
}

impl TweetPage {
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_empty()
    }
}
