//! Durable storage of tweets.
//!
//! The repository wraps a postgres connection pool and exposes the query
//! functions in [`sql_models`]. Business logic spanning several stores lives in
//! the [`facades`] layer.

use async_trait::async_trait;
use log::{debug, info};
use sqlx::postgres::PgPoolOptions;

use crate::{params, traits, types};

mod facades;
pub use facades::*;

mod sql_models;
pub use sql_models::*;

#[cfg(test)]
pub mod testing;

pub type Database = sqlx::Postgres;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("database error :: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error :: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Handle to the postgres database. Cloning is cheap, all clones share the same pool.
#[derive(Clone)]
pub struct Repository {
    pool: sqlx::Pool<Database>,
}

impl Repository {
    pub async fn try_new(url: &str) -> Result<Self, Error> {
        let max_connections = params::configurables().db_max_connections;

        debug!("connecting to database (max {} connections)", max_connections);
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("database schema up to date");
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
        let record = tweet_create(&self.pool, author_id.as_str(), text, image_ref).await?;
        Ok(record.tweet_id)
    }

    async fn get_tweet(&self, tweet_id: &types::TweetId) -> Result<Option<types::Tweet>, Error> {
        Ok(tweet_find_by_id(&self.pool, tweet_id).await?.map(Into::into))
    }

    async fn list_tweets(
        &self,
        after: &types::Cursor,
        limit: usize,
    ) -> Result<Vec<types::Tweet>, Error> {
        // LIMIT is a bigint, larger pages are unbounded anyway
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let records = tweet_find_after(&self.pool, after, limit).await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn update_tweet(
        &self,
        tweet_id: &types::TweetId,
        text: &str,
        image_ref: Option<&str>,
    ) -> Result<Option<types::Tweet>, Error> {
        Ok(tweet_update(&self.pool, tweet_id, text, image_ref)
            .await?
            .map(Into::into))
    }

    async fn delete_tweet(&self, tweet_id: &types::TweetId) -> Result<bool, Error> {
        Ok(tweet_delete(&self.pool, tweet_id).await? > 0)
    }
}
