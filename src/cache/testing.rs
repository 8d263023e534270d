//! Cache double with call counters and failure injection.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::Error;
use crate::{traits, types};

#[derive(Default)]
pub struct Cache {
    entries: Mutex<HashMap<types::TweetId, types::Tweet>>,
    ttls: Mutex<Vec<Duration>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
    deletes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the cache were unreachable.
    pub fn unreachable(self) -> Self {
        self.fail_reads.store(true, Ordering::SeqCst);
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn contains(&self, tweet_id: &types::TweetId) -> bool {
        self.entries.lock().unwrap().contains_key(tweet_id)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn ttls(&self) -> Vec<Duration> {
        self.ttls.lock().unwrap().clone()
    }

    fn injected() -> Error {
        Error::Redis(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "injected failure",
        )))
    }
}

#[async_trait]
impl traits::CacheStore for Cache {
    async fn get(&self, tweet_id: &types::TweetId) -> Result<Option<types::Tweet>, Error> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        let found = self.entries.lock().unwrap().get(tweet_id).cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::SeqCst),
            None => self.misses.fetch_add(1, Ordering::SeqCst),
        };
        Ok(found)
    }

    async fn set(
        &self,
        tweet_id: &types::TweetId,
        tweet: &types::Tweet,
        ttl: Duration,
    ) -> Result<(), Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        self.ttls.lock().unwrap().push(ttl);
        self.entries
            .lock()
            .unwrap()
            .insert(*tweet_id, tweet.clone());
        Ok(())
    }

    async fn delete(&self, tweet_id: &types::TweetId) -> Result<(), Error> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        self.entries.lock().unwrap().remove(tweet_id);
        Ok(())
    }
}
