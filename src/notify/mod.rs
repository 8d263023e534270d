//! New tweet notifications.
//!
//! Delivery is at most once: the caller is told whether the broker accepted
//! the message but a failure never undoes the operation that triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, trace};

use crate::{params, traits};

mod amqp;
pub use amqp::*;

#[cfg(test)]
pub mod testing;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("amqp error :: {0}")]
    Amqp(#[from] lapin::Error),
    #[error("message rejected by the broker")]
    Nacked,
}

/// Opens the publisher described by `params`, `None` disables notifications.
pub async fn connect(params: Option<&params::AmqpParams>) -> Result<traits::PublisherRef, Error> {
    match params {
        Some(params) => Ok(Arc::new(AmqpPublisher::connect(params).await?)),
        None => {
            info!("notifications disabled");
            Ok(Arc::new(Disabled))
        }
    }
}

/// Publisher dropping every message.
pub struct Disabled;

#[async_trait]
impl traits::Publisher for Disabled {
    async fn publish(&self, payload: &[u8]) -> Result<(), Error> {
        trace!("dropping notification ({} bytes)", payload.len());
        Ok(())
    }
}
