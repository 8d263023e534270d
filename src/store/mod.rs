//! Image blob storage.
//!
//! [`Store`] wraps an [`object_store`] backend selected from a URL. All objects
//! live under a single bucket prefix fixed at construction time.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, trace};
use object_store::{
    Attribute, Attributes, ObjectStore as _, PutOptions, PutPayload, aws::AmazonS3Builder,
    local::LocalFileSystem, memory::InMemory, path::Path,
};

use crate::{traits, types};

#[cfg(test)]
pub mod testing;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("object `{0}` not found")]
    NotFound(String),
    #[error("object store error :: {0}")]
    Backend(#[from] object_store::Error),
    #[error("bad store url :: {0}")]
    BadUrl(#[from] url::ParseError),
    #[error("unsupported store scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("io error :: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreRef = Arc<Store>;

pub struct Store {
    backend: Arc<dyn object_store::ObjectStore>,
    bucket: Path,
    /// Whether the backend persists object attributes (content type)
    attributes: bool,
}

impl Store {
    /// Builds a store from a backend url:
    ///
    /// * `s3://<bucket>` credentials and region are read from the environment
    /// * `file:///<path>` the directory is created if missing
    /// * `memory://` volatile, in-process
    pub fn try_from_url(url: &str, bucket: &str) -> Result<Self, Error> {
        let url = url::Url::parse(url)?;

        debug!("opening object store `{}` (bucket `{}`)", url, bucket);

        let (backend, attributes): (Arc<dyn object_store::ObjectStore>, bool) =
            match url.scheme() {
                "s3" => {
                    let name = url.host_str().unwrap_or_default();
                    let s3 = AmazonS3Builder::from_env()
                        .with_bucket_name(name)
                        .build()?;
                    (Arc::new(s3), true)
                }
                "file" => {
                    std::fs::create_dir_all(url.path())?;
                    (Arc::new(LocalFileSystem::new_with_prefix(url.path())?), false)
                }
                "memory" => (Arc::new(InMemory::new()), true),
                scheme => return Err(Error::UnsupportedScheme(scheme.to_owned())),
            };

        Ok(Self {
            backend,
            bucket: Path::from(bucket),
            attributes,
        })
    }

    pub fn in_memory(bucket: &str) -> Self {
        Self {
            backend: Arc::new(InMemory::new()),
            bucket: Path::from(bucket),
            attributes: true,
        }
    }

    fn location(&self, name: &str) -> Path {
        self.bucket.child(name)
    }
}

#[async_trait]
impl traits::ObjectStore for Store {
    async fn put(&self, name: &str, bytes: Bytes, content_type: &str) -> Result<(), Error> {
        let location = self.location(name);
        trace!("writing {} bytes to `{}`", bytes.len(), location);

        let mut opts = PutOptions::default();
        if self.attributes {
            let mut attributes = Attributes::new();
            attributes.insert(Attribute::ContentType, content_type.to_owned().into());
            opts.attributes = attributes;
        }

        self.backend
            .put_opts(&location, PutPayload::from(bytes), opts)
            .await?;

        Ok(())
    }

    async fn get(&self, name: &str) -> Result<types::ImageBlob, Error> {
        let location = self.location(name);
        trace!("reading `{}`", location);

        let result = match self.backend.get(&location).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Err(Error::NotFound(name.to_owned())),
            Err(e) => return Err(e.into()),
        };

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.to_string())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned());

        let bytes = result.bytes().await?;

        Ok(types::ImageBlob {
            bytes,
            content_type,
        })
    }

    async fn delete(&self, name: &str) -> Result<(), Error> {
        let location = self.location(name);
        trace!("deleting `{}`", location);

        match self.backend.delete(&location).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
