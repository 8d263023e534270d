//! Time bounded cache of single tweets.
//!
//! The cache is never authoritative: a miss or a failure always falls back to
//! the repository. Entries are keyed by tweet id and hold the JSON encoding of
//! [`types::Tweet`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};

use crate::{params, traits, types};

mod memory;
pub use memory::*;

mod redis_cache;
pub use redis_cache::*;

#[cfg(test)]
pub mod testing;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("redis error :: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("unable to decode cached tweet :: {0}")]
    Decode(serde_json::Error),
    #[error("unable to encode tweet :: {0}")]
    Encode(serde_json::Error),
    #[error("unsupported cache url `{0}`")]
    UnsupportedUrl(String),
}

/// Cache key of a tweet, shared by every remote backend.
pub fn key(tweet_id: &types::TweetId) -> String {
    format!("{}:{}", params::CACHE_KEY_PREFIX, tweet_id)
}

pub(crate) fn encode(tweet: &types::Tweet) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(tweet).map_err(Error::Encode)
}

pub(crate) fn decode(raw: &[u8]) -> Result<types::Tweet, Error> {
    serde_json::from_slice(raw).map_err(Error::Decode)
}

/// Opens the cache selected by `url`, `None` disables caching.
pub async fn connect(url: Option<&str>) -> Result<traits::CacheStoreRef, Error> {
    match url {
        None => {
            info!("cache disabled");
            Ok(Arc::new(NoCache))
        }
        Some(url) if url.starts_with("memory://") => {
            info!("using in-process cache");
            Ok(Arc::new(MemoryCache::new()))
        }
        Some(url) if url.starts_with("redis://") || url.starts_with("rediss://") => {
            debug!("connecting to redis cache");
            Ok(Arc::new(RedisCache::connect(url).await?))
        }
        Some(url) => Err(Error::UnsupportedUrl(url.to_owned())),
    }
}

/// Cache that never holds anything.
pub struct NoCache;

#[async_trait]
impl traits::CacheStore for NoCache {
    async fn get(&self, _: &types::TweetId) -> Result<Option<types::Tweet>, Error> {
        Ok(None)
    }

    async fn set(&self, _: &types::TweetId, _: &types::Tweet, _: Duration) -> Result<(), Error> {
        Ok(())
    }

    async fn delete(&self, _: &types::TweetId) -> Result<(), Error> {
        Ok(())
    }
}
