//! Keyset pagination cursor.
//!
//! A cursor marks a position in the `(created_at, tweet_id)` ascending order.
//! On the wire it is the standard base64 encoding of
//! `"<RFC 3339 timestamp with nanoseconds>,<tweet id>"`, clients must treat it
//! as opaque.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, SecondsFormat, Utc};

use super::TweetId;

/// Seconds from the UNIX epoch of `0001-01-01T00:00:00Z`, the lowest position of the order.
const START_UNIX_SECS: i64 = -62_135_596_800;

const FIELD_SEPARATOR: char = ',';

#[derive(thiserror::Error, Debug)]
pub enum CursorError {
    #[error("cursor is not valid base64 :: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("cursor payload is not valid utf-8 :: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("cursor must hold exactly two fields, found {0}")]
    FieldCount(usize),
    #[error("invalid cursor timestamp :: {0}")]
    Timestamp(#[from] chrono::ParseError),
    #[error("invalid cursor identifier :: {0}")]
    Identifier(#[from] uuid::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cursor {
    pub created_at: DateTime<Utc>,
    pub tweet_id: TweetId,
}

impl Cursor {
    pub fn new(created_at: DateTime<Utc>, tweet_id: TweetId) -> Self {
        Self {
            created_at,
            tweet_id,
        }
    }

    /// Position preceding every stored tweet, used when listing from the beginning.
    pub fn start() -> Self {
        Self {
            created_at: DateTime::<Utc>::from_timestamp(START_UNIX_SECS, 0).unwrap_or_default(),
            tweet_id: TweetId::nil(),
        }
    }

    pub fn encode(&self) -> String {
        let key = format!(
            "{}{}{}",
            self.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
            FIELD_SEPARATOR,
            self.tweet_id
        );
        STANDARD.encode(key)
    }

    pub fn decode(cursor: &str) -> Result<Self, CursorError> {
        let payload = String::from_utf8(STANDARD.decode(cursor)?)?;

        let fields: Vec<&str> = payload.split(FIELD_SEPARATOR).collect();
        let [created_at, tweet_id] = fields.as_slice() else {
            return Err(CursorError::FieldCount(fields.len()));
        };

        Ok(Self {
            created_at: DateTime::parse_from_rfc3339(created_at)?.with_timezone(&Utc),
            tweet_id: TweetId::parse_str(tweet_id)?,
        })
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl std::str::FromStr for Cursor {
    type Err = CursorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::decode(value)
    }
}
