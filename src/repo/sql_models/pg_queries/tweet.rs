use sqlx::{PgExecutor, Row, postgres::PgRow};

use crate::{
    repo::{self, sql_models},
    types,
};

const TWEET_COLUMNS: &str = "tweet_id, author_id, text, image_name, created_at, updated_at";

pub async fn tweet_create<'e>(
    exec: impl PgExecutor<'e>,
    author_id: &str,
    text: &str,
    image_ref: Option<&str>,
) -> Result<sql_models::TweetRecord, repo::Error> {
    let query = format!(
        "INSERT INTO tweet_t (author_id, text, image_name) VALUES ($1, $2, $3) RETURNING {TWEET_COLUMNS}"
    );

    let row = sqlx::query(&query)
        .bind(author_id)
        .bind(text)
        .bind(sql_models::image_name_column(image_ref))
        .fetch_one(exec)
        .await?;

    cast_tweet_record(row)
}

pub async fn tweet_find_by_id<'e>(
    exec: impl PgExecutor<'e>,
    tweet_id: &types::TweetId,
) -> Result<Option<sql_models::TweetRecord>, repo::Error> {
    let query = format!("SELECT {TWEET_COLUMNS} FROM tweet_t WHERE tweet_id = $1");

    let row = sqlx::query(&query)
        .bind(tweet_id)
        .fetch_optional(exec)
        .await?;

    row.map(cast_tweet_record).transpose()
}

/// Returns the page of tweets strictly following `after` in the
/// `(created_at, tweet_id)` order. The row value comparison lets postgres walk
/// the composite index.
pub async fn tweet_find_after<'e>(
    exec: impl PgExecutor<'e>,
    after: &types::Cursor,
    limit: i64,
) -> Result<Vec<sql_models::TweetRecord>, repo::Error> {
    let query = format!(
        "SELECT {TWEET_COLUMNS} FROM tweet_t
        WHERE (created_at, tweet_id) > ($1, $2)
        ORDER BY created_at, tweet_id
        LIMIT $3"
    );

    let rows = sqlx::query(&query)
        .bind(after.created_at)
        .bind(after.tweet_id)
        .bind(limit)
        .fetch_all(exec)
        .await?;

    rows.into_iter().map(cast_tweet_record).collect()
}

pub async fn tweet_update<'e>(
    exec: impl PgExecutor<'e>,
    tweet_id: &types::TweetId,
    text: &str,
    image_ref: Option<&str>,
) -> Result<Option<sql_models::TweetRecord>, repo::Error> {
    let query = format!(
        "UPDATE tweet_t
        SET text = $1, image_name = $2, updated_at = clock_timestamp()
        WHERE tweet_id = $3
        RETURNING {TWEET_COLUMNS}"
    );

    let row = sqlx::query(&query)
        .bind(text)
        .bind(sql_models::image_name_column(image_ref))
        .bind(tweet_id)
        .fetch_optional(exec)
        .await?;

    row.map(cast_tweet_record).transpose()
}

/// Returns the number of deleted rows.
pub async fn tweet_delete<'e>(
    exec: impl PgExecutor<'e>,
    tweet_id: &types::TweetId,
) -> Result<u64, repo::Error> {
    let res = sqlx::query("DELETE FROM tweet_t WHERE tweet_id = $1")
        .bind(tweet_id)
        .execute(exec)
        .await?;

    Ok(res.rows_affected())
}

fn cast_tweet_record(row: PgRow) -> Result<sql_models::TweetRecord, repo::Error> {
    Ok(sql_models::TweetRecord {
        tweet_id: row.try_get("tweet_id")?,
        author_id: row.try_get("author_id")?,
        text: row.try_get("text")?,
        image_name: row.try_get("image_name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
