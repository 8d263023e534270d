//! Capability sets consumed by [`crate::repo::FacadeTweet`].
//!
//! Each backing system is reached only through one of these traits so that
//! implementations (PostgreSQL, Redis, S3, AMQP, test doubles) can be swapped
//! independently. Handles are long lived and shared by reference across
//! concurrent requests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{cache, notify, repo, store, types};

pub type DurableStoreRef = Arc<dyn DurableStore>;
pub type CacheStoreRef = Arc<dyn CacheStore>;
pub type ObjectStoreRef = Arc<dyn ObjectStore>;
pub type PublisherRef = Arc<dyn Publisher>;

/// Authoritative record of tweets, owns identity and timestamps.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn create_tweet(
        &self,
        author_id: &types::UserId,
        text: &str,
        image_ref: Option<&str>,
    ) -> Result<types::TweetId, repo::Error>;

    async fn get_tweet(
        &self,
        tweet_id: &types::TweetId,
    ) -> Result<Option<types::Tweet>, repo::Error>;

    /// Returns at most `limit` tweets strictly after `after`, ascending by
    /// `(created_at, tweet_id)`.
    async fn list_tweets(
        &self,
        after: &types::Cursor,
        limit: usize,
    ) -> Result<Vec<types::Tweet>, repo::Error>;

    /// Writes text and image reference and bumps `updated_at`. Returns [`None`]
    /// if the tweet does not exist.
    async fn update_tweet(
        &self,
        tweet_id: &types::TweetId,
        text: &str,
        image_ref: Option<&str>,
    ) -> Result<Option<types::Tweet>, repo::Error>;

    /// Returns `false` when no row was affected.
    async fn delete_tweet(&self, tweet_id: &types::TweetId) -> Result<bool, repo::Error>;
}

/// Lossy, time bounded mirror of single tweets.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, tweet_id: &types::TweetId) -> Result<Option<types::Tweet>, cache::Error>;

    async fn set(
        &self,
        tweet_id: &types::TweetId,
        tweet: &types::Tweet,
        ttl: Duration,
    ) -> Result<(), cache::Error>;

    async fn delete(&self, tweet_id: &types::TweetId) -> Result<(), cache::Error>;
}

/// Name addressed blob storage for tweet images, the bucket is fixed per deployment.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, name: &str, bytes: Bytes, content_type: &str) -> Result<(), store::Error>;

    async fn get(&self, name: &str) -> Result<types::ImageBlob, store::Error>;

    /// Deleting a missing object is not an error.
    async fn delete(&self, name: &str) -> Result<(), store::Error>;
}

/// At-most-once emitter of notification payloads.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, payload: &[u8]) -> Result<(), notify::Error>;
}
