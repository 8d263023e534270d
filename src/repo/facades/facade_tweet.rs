use std::time::Duration;

use log::{debug, info, trace, warn};

use super::{Advisory, FacadeError, Outcome, SideEffect};
use crate::{params, traits, types};

/// Facade implementing the tweet use cases.
///
/// It sequences calls to the durable store, the cache, the object store and
/// the notification publisher. The durable store is the source of truth: cache
/// and notification failures are reported as advisories, a failed upload is
/// tolerated on create and fatal on update.
///
/// The facade keeps no state between calls, the store handles are shared with
/// every other facade built from the same references.
pub struct FacadeTweet {
    repo: traits::DurableStoreRef,
    cache: traits::CacheStoreRef,
    store: traits::ObjectStoreRef,
    publisher: traits::PublisherRef,

    page_size: usize,
    cache_ttl: Duration,
}

impl FacadeTweet {
    pub fn new(
        repo: traits::DurableStoreRef,
        cache: traits::CacheStoreRef,
        store: traits::ObjectStoreRef,
        publisher: traits::PublisherRef,
    ) -> Self {
        let params = params::configurables();
        Self {
            repo,
            cache,
            store,
            publisher,
            page_size: params.page_size,
            cache_ttl: params.cache_ttl,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Creates a tweet and returns its identifier.
    ///
    /// The image, if any, is uploaded before the row is written; a failed
    /// upload creates the tweet without image. Once the row exists the tweet
    /// is created, notification failures are reported as advisories.
    pub async fn create(&self, new: types::NewTweet) -> Result<Outcome<types::TweetId>, FacadeError> {
        info!("creating tweet for user `{}`", new.author_id);

        let mut advisories = Vec::new();

        let mut image_ref = None;
        if let Some(image) = new.image {
            match self
                .store
                .put(&image.name, image.bytes, &image.content_type)
                .await
            {
                Ok(()) => image_ref = Some(image.name),
                Err(e) => {
                    warn!("unable to upload image `{}`, creating tweet without it: {}", image.name, e);
                    advisories.push(Advisory::new(SideEffect::ImageUpload, e));
                }
            }
        }

        let tweet_id = self
            .repo
            .create_tweet(&new.author_id, &new.text, image_ref.as_deref())
            .await?;

        trace!("tweet `{}` created", tweet_id);

        let notification = types::NewTweetNotification::new(new.author_id);
        let published = match notification.to_bytes() {
            Ok(payload) => self.publisher.publish(&payload).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(e) = published {
            warn!("unable to publish new tweet notification for `{}`: {}", tweet_id, e);
            advisories.push(Advisory::new(SideEffect::Notify, e));
        }

        Ok(Outcome::new(tweet_id, advisories))
    }

    /// Reads a tweet using the cache-aside protocol. The cache never fails a read.
    pub async fn get(&self, tweet_id: &types::TweetId) -> Result<Outcome<types::Tweet>, FacadeError> {
        info!("requested tweet `{}`", tweet_id);

        let mut advisories = Vec::new();

        match self.cache.get(tweet_id).await {
            Ok(Some(tweet)) => {
                trace!("cache hit for `{}`", tweet_id);
                return Ok(Outcome::new(tweet, advisories));
            }
            Ok(None) => trace!("cache miss for `{}`", tweet_id),
            Err(e) => {
                debug!("cache lookup for `{}` failed, falling back to repository: {}", tweet_id, e);
                advisories.push(Advisory::new(SideEffect::CacheLookup, e));
            }
        }

        let tweet = self.find(tweet_id).await?;

        if let Err(e) = self.cache.set(tweet_id, &tweet, self.cache_ttl).await {
            warn!("unable to cache tweet `{}`: {}", tweet_id, e);
            advisories.push(Advisory::new(SideEffect::CachePopulate, e));
        }

        Ok(Outcome::new(tweet, advisories))
    }

    /// Returns the page following `cursor`, an empty cursor starts from the
    /// oldest tweet. The returned cursor is empty once the stream is exhausted.
    pub async fn list(&self, cursor: &str) -> Result<types::TweetPage, FacadeError> {
        info!("listing tweets");

        let after = if cursor.is_empty() {
            types::Cursor::start()
        } else {
            types::Cursor::decode(cursor)?
        };

        // One extra row tells whether another page exists
        let mut tweets = self
            .repo
            .list_tweets(&after, self.page_size.saturating_add(1))
            .await?;

        let next_cursor = if tweets.len() > self.page_size {
            tweets.truncate(self.page_size);
            tweets
                .last()
                .map(|t| t.cursor().encode())
                .unwrap_or_default()
        } else {
            String::new()
        };

        trace!("listed {} tweets (last page: {})", tweets.len(), next_cursor.is_empty());

        Ok(types::TweetPage {
            tweets,
            next_cursor,
        })
    }

    /// Updates text and, optionally, the image of a tweet owned by `edit.user_id`.
    ///
    /// A new image is written before the row and the old image is removed only
    /// once the row references the new one, so the row never names a missing
    /// blob. A failed upload or row write aborts the update; a failed removal
    /// of the old image is reported as an advisory.
    pub async fn update(&self, edit: types::TweetEdit) -> Result<Outcome<types::Tweet>, FacadeError> {
        info!("user `{}` requested update of tweet `{}`", edit.user_id, edit.tweet_id);

        let current = self.find_owned(&edit.tweet_id, &edit.user_id).await?;

        // Blob written by this update under a new name, and the one it replaces
        let mut uploaded = None;
        let mut replaced = None;

        let image_ref = match edit.image {
            Some(image) => {
                self.store
                    .put(&image.name, image.bytes, &image.content_type)
                    .await?;

                // Same name means the put already replaced the blob in place
                if current.image_ref.as_deref() != Some(image.name.as_str()) {
                    uploaded = Some(image.name.clone());
                    replaced = current.image_ref;
                }
                Some(image.name)
            }
            None => current.image_ref,
        };

        let written = self
            .repo
            .update_tweet(&edit.tweet_id, &edit.text, image_ref.as_deref())
            .await;

        let updated = match written {
            Ok(Some(tweet)) => tweet,
            res => {
                if let Some(name) = &uploaded {
                    self.discard_image(name).await;
                }
                return match res {
                    Err(e) => Err(e.into()),
                    _ => Err(FacadeError::NotFound(format!("tweet `{}`", edit.tweet_id))),
                };
            }
        };

        let mut advisories = Vec::new();
        self.invalidate(&edit.tweet_id, &mut advisories).await;

        if let Some(previous) = replaced {
            match self.store.delete(&previous).await {
                Ok(()) => trace!("old image `{}` removed", previous),
                Err(e) => {
                    warn!("tweet `{}` updated but its old image `{}` was not removed: {}", edit.tweet_id, previous, e);
                    advisories.push(Advisory::new(SideEffect::ImageCleanup, e));
                }
            }
        }

        Ok(Outcome::new(updated, advisories))
    }

    /// Deletes a tweet owned by `user_id`, then drops its cache entry and image.
    pub async fn delete(
        &self,
        tweet_id: &types::TweetId,
        user_id: &types::UserId,
    ) -> Result<Outcome<()>, FacadeError> {
        warn!("user `{}` requested deletion of tweet `{}`", user_id, tweet_id);

        let current = self.find_owned(tweet_id, user_id).await?;

        if !self.repo.delete_tweet(tweet_id).await? {
            return Err(FacadeError::NotFound(format!("tweet `{tweet_id}`")));
        }

        let mut advisories = Vec::new();
        self.invalidate(tweet_id, &mut advisories).await;

        if let Some(image) = current.image_ref {
            if let Err(e) = self.store.delete(&image).await {
                warn!("tweet `{}` deleted but its image `{}` was not: {}", tweet_id, image, e);
                advisories.push(Advisory::new(SideEffect::ImageCleanup, e));
            }
        }

        warn!("tweet `{}` deleted", tweet_id);

        Ok(Outcome::new((), advisories))
    }

    /// Returns the image attached to a tweet.
    pub async fn image(
        &self,
        tweet_id: &types::TweetId,
    ) -> Result<Outcome<types::ImageBlob>, FacadeError> {
        let (tweet, advisories) = self.get(tweet_id).await?.into_parts();

        let name = tweet
            .image_ref
            .ok_or_else(|| FacadeError::NotFound(format!("image of tweet `{tweet_id}`")))?;

        trace!("reading image `{}`", name);
        let blob = self.store.get(&name).await?;

        Ok(Outcome::new(blob, advisories))
    }

    async fn find(&self, tweet_id: &types::TweetId) -> Result<types::Tweet, FacadeError> {
        self.repo
            .get_tweet(tweet_id)
            .await?
            .ok_or_else(|| FacadeError::NotFound(format!("tweet `{tweet_id}`")))
    }

    /// Reads the current row from the repository and checks its author.
    async fn find_owned(
        &self,
        tweet_id: &types::TweetId,
        user_id: &types::UserId,
    ) -> Result<types::Tweet, FacadeError> {
        let tweet = self.find(tweet_id).await?;

        if !tweet.is_authored_by(user_id) {
            warn!("user `{}` is not the author of tweet `{}`", user_id, tweet_id);
            return Err(FacadeError::PermissionDenied {
                tweet_id: *tweet_id,
                user: user_id.clone(),
            });
        }

        Ok(tweet)
    }

    /// Removes a blob written by an update that did not go through.
    async fn discard_image(&self, name: &str) {
        if let Err(e) = self.store.delete(name).await {
            warn!("image `{}` left orphaned: {}", name, e);
        }
    }

    async fn invalidate(&self, tweet_id: &types::TweetId, advisories: &mut Vec<Advisory>) {
        if let Err(e) = self.cache.delete(tweet_id).await {
            warn!("unable to invalidate cached tweet `{}`: {}", tweet_id, e);
            advisories.push(Advisory::new(SideEffect::CacheInvalidate, e));
        }
    }
}
