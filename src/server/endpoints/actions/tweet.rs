//! Tweet action handlers.

use log::{info, warn};

use super::{ActionContext, ActionResponse};
use crate::{repo::Outcome, server::errors::ServerError, types};

/// Handler for all tweet actions.
pub struct TweetActionHandler;

impl TweetActionHandler {
    pub async fn create(
        ctx: &ActionContext,
        author: &str,
        text: String,
        image: Option<types::ImageUpload>,
    ) -> Result<Outcome<ActionResponse>, ServerError> {
        let author = parse_user(author)?;
        info!("requested tweet creation by `{}`", author);

        let mut new = types::NewTweet::new(author, text);
        if let Some(image) = image {
            new = new.with_image(image);
        }

        let outcome = ctx.guard(ctx.facade.create(new)).await?;
        let notification_published = outcome.notification_published();

        Ok(outcome.map(|tweet_id| ActionResponse::Created {
            tweet_id,
            notification_published,
        }))
    }

    pub async fn get(
        ctx: &ActionContext,
        tweet_id: &str,
    ) -> Result<Outcome<ActionResponse>, ServerError> {
        let tweet_id = parse_tweet_id(tweet_id)?;

        let outcome = ctx.guard(ctx.facade.get(&tweet_id)).await?;
        Ok(outcome.map(ActionResponse::Tweet))
    }

    pub async fn list(
        ctx: &ActionContext,
        cursor: &str,
    ) -> Result<Outcome<ActionResponse>, ServerError> {
        let page = ctx.guard(ctx.facade.list(cursor.trim())).await?;
        Ok(Outcome::new(ActionResponse::Page(page), Vec::new()))
    }

    pub async fn update(
        ctx: &ActionContext,
        tweet_id: &str,
        user: &str,
        text: String,
        image: Option<types::ImageUpload>,
    ) -> Result<Outcome<ActionResponse>, ServerError> {
        let tweet_id = parse_tweet_id(tweet_id)?;
        let user = parse_user(user)?;

        let mut edit = types::TweetEdit::new(tweet_id, user, text);
        if let Some(image) = image {
            edit = edit.with_image(image);
        }

        let outcome = ctx.guard(ctx.facade.update(edit)).await?;
        Ok(outcome.map(ActionResponse::Tweet))
    }

    pub async fn delete(
        ctx: &ActionContext,
        tweet_id: &str,
        user: &str,
    ) -> Result<Outcome<ActionResponse>, ServerError> {
        let tweet_id = parse_tweet_id(tweet_id)?;
        let user = parse_user(user)?;
        warn!("requested deletion of tweet `{}`", tweet_id);

        let outcome = ctx.guard(ctx.facade.delete(&tweet_id, &user)).await?;
        Ok(outcome.map(|()| ActionResponse::Empty))
    }

    pub async fn image(
        ctx: &ActionContext,
        tweet_id: &str,
    ) -> Result<Outcome<ActionResponse>, ServerError> {
        let tweet_id = parse_tweet_id(tweet_id)?;

        let outcome = ctx.guard(ctx.facade.image(&tweet_id)).await?;
        Ok(outcome.map(ActionResponse::Image))
    }
}

fn parse_tweet_id(raw: &str) -> Result<types::TweetId, ServerError> {
    Ok(raw.trim().parse()?)
}

fn parse_user(raw: &str) -> Result<types::UserId, ServerError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ServerError::MissingUser);
    }
    Ok(raw.into())
}
