//! Action handlers for tweet requests.
//!
//! Handlers validate raw request values, run the matching use case under the
//! caller's cancellation token and deadline, and wrap the result in an
//! [`ActionResponse`].

mod tweet;

pub use tweet::TweetActionHandler;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{
    repo::{FacadeError, FacadeTweet},
    types, utils,
};

/// Shared context for all action handlers.
pub struct ActionContext {
    pub facade: Arc<FacadeTweet>,
    pub cancel: CancellationToken,
    pub timeout: Option<Duration>,
}

impl ActionContext {
    pub fn new(facade: Arc<FacadeTweet>, cancel: CancellationToken) -> Self {
        Self {
            facade,
            cancel,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn guard<T>(
        &self,
        fut: impl Future<Output = Result<T, FacadeError>>,
    ) -> Result<T, FacadeError> {
        utils::guarded(&self.cancel, self.timeout, fut).await
    }
}

#[derive(Debug)]
pub enum ActionResponse {
    Created {
        tweet_id: types::TweetId,
        notification_published: bool,
    },
    Tweet(types::Tweet),
    Page(types::TweetPage),
    Image(types::ImageBlob),
    Empty,
}
