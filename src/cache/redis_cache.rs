use std::time::Duration;

use async_trait::async_trait;
use log::trace;
use redis::{AsyncCommands, aio::ConnectionManager};

use super::{Error, decode, encode, key};
use crate::{traits, types};

/// Redis backed cache. The connection manager reconnects on its own, clones
/// share the same multiplexed connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self, Error> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl traits::CacheStore for RedisCache {
    async fn get(&self, tweet_id: &types::TweetId) -> Result<Option<types::Tweet>, Error> {
        let mut conn = self.conn.clone();
        let raw: Option<Vec<u8>> = conn.get(key(tweet_id)).await?;
        raw.as_deref().map(decode).transpose()
    }

    async fn set(
        &self,
        tweet_id: &types::TweetId,
        tweet: &types::Tweet,
        ttl: Duration,
    ) -> Result<(), Error> {
        let Some(millis) = expiry_millis(ttl) else {
            trace!("skipping cache write for `{}` (zero ttl)", tweet_id);
            return Ok(());
        };

        let mut conn = self.conn.clone();
        conn.pset_ex::<_, _, ()>(key(tweet_id), encode(tweet)?, millis)
            .await?;
        Ok(())
    }

    async fn delete(&self, tweet_id: &types::TweetId) -> Result<(), Error> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key(tweet_id)).await?;
        Ok(())
    }
}

/// Expiry in milliseconds for `PSETEX`, `None` when the entry would be stale
/// on arrival (redis rejects a zero expiry).
fn expiry_millis(ttl: Duration) -> Option<u64> {
    match u64::try_from(ttl.as_millis()) {
        Ok(0) => None,
        Ok(millis) => Some(millis),
        Err(_) => Some(u64::MAX),
    }
}
