//! Object store double recording every operation.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use super::Error;
use crate::{traits, types};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Put(String),
    Get(String),
    Delete(String),
}

#[derive(Default)]
pub struct Store {
    objects: Mutex<HashMap<String, types::ImageBlob>>,
    ops: Mutex<Vec<Op>>,
    fail_put: AtomicBool,
    fail_delete: AtomicBool,
    /// Names whose deletion fails
    failing_names: Mutex<Vec<String>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_put(self) -> Self {
        self.fail_put.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_fail_put(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Makes only the deletion of `name` fail.
    pub fn fail_delete_of(&self, name: &str) {
        self.failing_names.lock().unwrap().push(name.to_owned());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.lock().unwrap().contains_key(name)
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    /// Number of mutating operations attempted.
    pub fn writes(&self) -> usize {
        self.ops()
            .iter()
            .filter(|op| !matches!(op, Op::Get(_)))
            .count()
    }

    fn injected() -> Error {
        Error::Backend(object_store::Error::Generic {
            store: "test",
            source: "injected failure".into(),
        })
    }
}

#[async_trait]
impl traits::ObjectStore for Store {
    async fn put(&self, name: &str, bytes: Bytes, content_type: &str) -> Result<(), Error> {
        self.ops.lock().unwrap().push(Op::Put(name.to_owned()));
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(Self::injected());
        }

        self.objects.lock().unwrap().insert(
            name.to_owned(),
            types::ImageBlob {
                bytes,
                content_type: content_type.to_owned(),
            },
        );
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<types::ImageBlob, Error> {
        self.ops.lock().unwrap().push(Op::Get(name.to_owned()));
        self.objects
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    async fn delete(&self, name: &str) -> Result<(), Error> {
        self.ops.lock().unwrap().push(Op::Delete(name.to_owned()));
        if self.fail_delete.load(Ordering::SeqCst)
            || self.failing_names.lock().unwrap().iter().any(|n| n == name)
        {
            return Err(Self::injected());
        }

        self.objects.lock().unwrap().remove(name);
        Ok(())
    }
}
