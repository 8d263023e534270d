use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{Error, decode, encode};
use crate::{traits, types};

struct Entry {
    payload: Vec<u8>,
    /// `None` when the ttl exceeds what the clock can represent
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self) -> bool {
        self.expires_at.is_none_or(|at| at > Instant::now())
    }
}

/// In-process cache, entries are stored encoded like in a remote cache.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<types::TweetId, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl traits::CacheStore for MemoryCache {
    async fn get(&self, tweet_id: &types::TweetId) -> Result<Option<types::Tweet>, Error> {
        let mut entries = self.entries.lock().await;

        match entries.get(tweet_id) {
            Some(entry) if entry.is_live() => decode(&entry.payload).map(Some),
            Some(_) => {
                entries.remove(tweet_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        tweet_id: &types::TweetId,
        tweet: &types::Tweet,
        ttl: Duration,
    ) -> Result<(), Error> {
        let entry = Entry {
            payload: encode(tweet)?,
            expires_at: Instant::now().checked_add(ttl),
        };
        self.entries.lock().await.insert(*tweet_id, entry);
        Ok(())
    }

    async fn delete(&self, tweet_id: &types::TweetId) -> Result<(), Error> {
        self.entries.lock().await.remove(tweet_id);
        Ok(())
    }
}
