//! Publisher double keeping every accepted payload.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::Error;
use crate::traits;

#[derive(Default)]
pub struct Publisher {
    messages: Mutex<Vec<Vec<u8>>>,
    attempts: AtomicUsize,
    fail: AtomicBool,
}

impl Publisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every publish is rejected by the broker.
    pub fn rejecting(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    pub fn messages(&self) -> Vec<Vec<u8>> {
        self.messages.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl traits::Publisher for Publisher {
    async fn publish(&self, payload: &[u8]) -> Result<(), Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Nacked);
        }

        self.messages.lock().unwrap().push(payload.to_vec());
        Ok(())
    }
}
