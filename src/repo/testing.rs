//! In-memory repository with the same ordering and identity rules as postgres.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use super::Error;
use crate::{traits, types};

pub struct Repository {
    rows: Mutex<BTreeMap<types::TweetId, types::Tweet>>,
    now: Mutex<DateTime<Utc>>,
    /// When set the clock never advances, every row shares the same timestamp
    frozen: bool,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail: AtomicBool,
    fail_updates: AtomicBool,
    /// Rows disappear right before an update reaches them
    vanish_on_update: AtomicBool,
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            rows: Mutex::default(),
            now: Mutex::new(DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(365 * 50)),
            frozen: false,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            vanish_on_update: AtomicBool::new(false),
        }
    }
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frozen_clock(mut self) -> Self {
        self.frozen = true;
        self
    }

    /// Every call fails as if the database were unreachable.
    pub fn unavailable(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    /// Only row updates fail, reads and other writes go through.
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Simulates a concurrent delete landing between read and update.
    pub fn set_vanish_on_update(&self, vanish: bool) {
        self.vanish_on_update.store(vanish, Ordering::SeqCst);
    }

    pub fn row(&self, tweet_id: &types::TweetId) -> Option<types::Tweet> {
        self.rows.lock().unwrap().get(tweet_id).cloned()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn tick(&self) -> DateTime<Utc> {
        let mut now = self.now.lock().unwrap();
        if !self.frozen {
            *now += TimeDelta::milliseconds(1);
        }
        *now
    }

    fn check(&self) -> Result<(), Error> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl traits::DurableStore for Repository {
    async fn create_tweet(
        &self,
        author_id: &types::UserId,
        text: &str,
        image_ref: Option<&str>,
    ) -> Result<types::TweetId, Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let now = self.tick();
        let tweet = types::Tweet {
            tweet_id: uuid::Uuid::new_v4(),
            author_id: author_id.clone(),
            text: text.to_owned(),
            image_ref: image_ref.map(str::to_owned),
            created_at: now,
            updated_at: now,
        };
        let tweet_id = tweet.tweet_id;
        self.rows.lock().unwrap().insert(tweet_id, tweet);

        Ok(tweet_id)
    }

    async fn get_tweet(&self, tweet_id: &types::TweetId) -> Result<Option<types::Tweet>, Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.row(tweet_id))
    }

    async fn list_tweets(
        &self,
        after: &types::Cursor,
        limit: usize,
    ) -> Result<Vec<types::Tweet>, Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let mut tweets: Vec<_> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.cursor() > *after)
            .cloned()
            .collect();
        tweets.sort_by_key(types::Tweet::cursor);
        tweets.truncate(limit);

        Ok(tweets)
    }

    async fn update_tweet(
        &self,
        tweet_id: &types::TweetId,
        text: &str,
        image_ref: Option<&str>,
    ) -> Result<Option<types::Tweet>, Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }

        let now = self.tick();
        let mut rows = self.rows.lock().unwrap();
        if self.vanish_on_update.load(Ordering::SeqCst) {
            rows.remove(tweet_id);
        }
        Ok(rows.get_mut(tweet_id).map(|tweet| {
            tweet.text = text.to_owned();
            tweet.image_ref = image_ref.map(str::to_owned);
            tweet.updated_at = now;
            tweet.clone()
        }))
    }

    async fn delete_tweet(&self, tweet_id: &types::TweetId) -> Result<bool, Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.rows.lock().unwrap().remove(tweet_id).is_some())
    }
}
