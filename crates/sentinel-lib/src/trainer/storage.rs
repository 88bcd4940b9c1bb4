//! Remote object storage for datasets and model artifacts

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bucket/key addressed object store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Download `bucket/key` to `dest`, returning the number of bytes written
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64>;

    /// Upload the file at `src` to `bucket/key`
    async fn upload(&self, src: &Path, bucket: &str, key: &str) -> Result<()>;
}

/// Amazon S3 object store
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default credential and region chain
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        let object = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .with_context(|| format!("Failed to get s3://{}/{}", bucket, key))?;

        let bytes = object
            .body
            .collect()
            .await
            .with_context(|| format!("Failed to read body of s3://{}/{}", bucket, key))?
            .into_bytes();

        tokio::fs::write(dest, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", dest.display()))?;

        debug!(bucket = %bucket, key = %key, bytes = bytes.len(), "Downloaded object");
        Ok(bytes.len() as u64)
    }

    async fn upload(&self, src: &Path, bucket: &str, key: &str) -> Result<()> {
        let body = ByteStream::from_path(src)
            .await
            .with_context(|| format!("Failed to open {}", src.display()))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to put s3://{}/{}", bucket, key))?;

        debug!(bucket = %bucket, key = %key, "Uploaded object");
        Ok(())
    }
}

/// Directory-backed object store laid out as `<root>/<bucket>/<key>`
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn download(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        let source = self.object_path(bucket, key);
        tokio::fs::copy(&source, dest)
            .await
            .with_context(|| format!("Failed to copy {} to {}", source.display(), dest.display()))
    }

    async fn upload(&self, src: &Path, bucket: &str, key: &str) -> Result<()> {
        let target = self.object_path(bucket, key);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::copy(src, &target)
            .await
            .with_context(|| format!("Failed to copy {} to {}", src.display(), target.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path().join("store"));

        let src = dir.path().join("model.json");
        std::fs::write(&src, b"{}").unwrap();
        store.upload(&src, "bucket", "models/model.json").await.unwrap();
        assert!(store.object_path("bucket", "models/model.json").exists());

        let dest = dir.path().join("copy.json");
        let bytes = store.download("bucket", "models/model.json", &dest).await.unwrap();
        assert_eq!(bytes, 2);
    }

    #[tokio::test]
    async fn test_local_store_missing_object() {
        let dir = TempDir::new().unwrap();
        let store = LocalObjectStore::new(dir.path());

        let result = store
            .download("bucket", "data/missing.csv", &dir.path().join("out.csv"))
            .await;
        assert!(result.is_err());
    }
}
