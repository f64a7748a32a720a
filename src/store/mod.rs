//! Object storage backend
//!
//! Thin wrapper around an [`object_store::ObjectStore`] implementation. The
//! gateway never interprets object bytes; it streams them through and relays
//! the store's own content metadata and integrity tag. Storage failures are
//! not retried or translated here, they propagate to the caller.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{Attributes, ObjectStore, WriteMultipart};

use crate::config::StorageConfig;
use crate::error::{Error, Result};

/// An object fetched from the backing store
pub struct StoredObject {
    /// Object size in bytes
    pub size: usize,

    /// Last modification time reported by the store
    pub last_modified: DateTime<Utc>,

    /// Integrity tag, exposed verbatim to clients
    pub e_tag: Option<String>,

    /// Content metadata held by the store (content-type, cache-control, ...)
    pub attributes: Attributes,

    /// Object byte stream
    pub stream: BoxStream<'static, object_store::Result<Bytes>>,
}

impl StoredObject {
    /// Collect the full payload into memory. Intended for small objects
    /// and tests; request handling streams instead.
    pub async fn bytes(mut self) -> Result<Bytes> {
        let mut buf = Vec::with_capacity(self.size);
        while let Some(chunk) = self.stream.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.into())
    }
}

/// Handle to the single backing bucket
#[derive(Clone)]
pub struct Bucket {
    store: Arc<dyn ObjectStore>,
}

impl Bucket {
    /// Build a bucket from storage configuration
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        match config.backend.as_str() {
            "filesystem" => Self::filesystem(&config.root),
            "memory" => Ok(Self::memory()),
            other => Err(Error::Config(format!("unknown storage backend: {}", other))),
        }
    }

    /// Bucket backed by a local directory
    pub fn filesystem(root: &std::path::Path) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        let store = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self {
            store: Arc::new(store),
        })
    }

    /// Ephemeral in-memory bucket
    pub fn memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
        }
    }

    /// Store a byte stream under `key`, replacing any existing object.
    ///
    /// The body is fed to the store chunk by chunk as it arrives; it is
    /// never buffered whole. A failed body read aborts the upload.
    pub async fn put<S, E>(&self, key: &str, mut body: S) -> Result<()>
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        let location = Self::location(key)?;
        let upload = self.store.put_multipart(&location).await?;
        let mut write = WriteMultipart::new(upload);

        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(chunk) => write.put(chunk),
                Err(e) => {
                    let _ = write.abort().await;
                    return Err(Error::Io(std::io::Error::other(format!(
                        "request body read failed: {}",
                        e
                    ))));
                }
            }
        }

        write.finish().await?;
        tracing::debug!(key, "object written");
        Ok(())
    }

    /// Fetch the object stored under `key`, or `None` if absent
    pub async fn get(&self, key: &str) -> Result<Option<StoredObject>> {
        let location = Self::location(key)?;
        match self.store.get(&location).await {
            Ok(result) => {
                let meta = result.meta.clone();
                let attributes = result.attributes.clone();
                Ok(Some(StoredObject {
                    size: meta.size,
                    last_modified: meta.last_modified,
                    e_tag: meta.e_tag,
                    attributes,
                    stream: result.into_stream(),
                }))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the object stored under `key`.
    ///
    /// Idempotent: deleting a key that was never stored succeeds.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let location = Self::location(key)?;
        match self.store.delete(&location).await {
            Ok(()) => {
                tracing::debug!(key, "object deleted");
                Ok(())
            }
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Map a request key onto a store path.
    ///
    /// The gateway performs no normalization of its own; keys with `..` or
    /// other non-canonical segments reach this point untouched and are
    /// rejected by the store's path rules, surfacing as a store error.
    fn location(key: &str) -> Result<Path> {
        Ok(Path::parse(key).map_err(object_store::Error::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use tempfile::tempdir;

    fn body(bytes: &'static [u8]) -> impl Stream<Item = std::io::Result<Bytes>> + Unpin {
        stream::iter(vec![Ok(Bytes::from_static(bytes))])
    }

    #[tokio::test]
    async fn test_put_get_roundtrip_memory() {
        let bucket = Bucket::memory();
        bucket.put("worker.txt", body(b"hello world")).await.unwrap();

        let object = bucket.get("worker.txt").await.unwrap().unwrap();
        assert_eq!(object.size, 11);
        assert!(object.e_tag.is_some());
        assert_eq!(object.bytes().await.unwrap(), Bytes::from_static(b"hello world"));
    }

    #[tokio::test]
    async fn test_put_get_roundtrip_filesystem() {
        let dir = tempdir().unwrap();
        let bucket = Bucket::filesystem(dir.path()).unwrap();
        bucket.put("nested/key.bin", body(b"payload")).await.unwrap();

        let object = bucket.get("nested/key.bin").await.unwrap().unwrap();
        assert_eq!(object.bytes().await.unwrap(), Bytes::from_static(b"payload"));
    }

    #[tokio::test]
    async fn test_put_streams_multiple_chunks() {
        let bucket = Bucket::memory();
        let chunks: Vec<std::io::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"chunk-one ")),
            Ok(Bytes::from_static(b"chunk-two")),
        ];
        bucket.put("streamed.txt", stream::iter(chunks)).await.unwrap();

        let object = bucket.get("streamed.txt").await.unwrap().unwrap();
        assert_eq!(
            object.bytes().await.unwrap(),
            Bytes::from_static(b"chunk-one chunk-two")
        );
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let bucket = Bucket::memory();
        bucket.put("k", body(b"first")).await.unwrap();
        bucket.put("k", body(b"second")).await.unwrap();

        let object = bucket.get("k").await.unwrap().unwrap();
        assert_eq!(object.bytes().await.unwrap(), Bytes::from_static(b"second"));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let bucket = Bucket::memory();
        assert!(bucket.get("missing.txt").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let bucket = Bucket::memory();
        bucket.delete("never-stored.txt").await.unwrap();

        bucket.put("stored.txt", body(b"x")).await.unwrap();
        bucket.delete("stored.txt").await.unwrap();
        assert!(bucket.get("stored.txt").await.unwrap().is_none());
        bucket.delete("stored.txt").await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_body_aborts_upload() {
        let bucket = Bucket::memory();
        let chunks: Vec<std::io::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(std::io::Error::other("client went away")),
        ];
        let result = bucket.put("broken.txt", stream::iter(chunks)).await;
        assert!(result.is_err());
        assert!(bucket.get("broken.txt").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_traversal_key_is_a_store_error() {
        let bucket = Bucket::memory();
        let result = bucket.get("../etc/passwd").await;
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn test_from_config_rejects_unknown_backend() {
        let config = StorageConfig {
            backend: "tape".to_string(),
            root: std::path::PathBuf::from("/tmp"),
        };
        assert!(Bucket::from_config(&config).is_err());
    }
}
