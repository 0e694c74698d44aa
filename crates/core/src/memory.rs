use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;

use crate::client::{Bucket, FromCredentials, StorageClient};
use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::object::ObjectName;

/// In-process object store that counts every call made against it.
///
/// Used in tests in place of a real storage service.
#[derive(Debug, Default)]
pub struct MemoryClient {
    objects: Mutex<HashMap<(String, String), Bytes>>,
    exists_calls: AtomicUsize,
    upload_calls: AtomicUsize,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object directly, as if some earlier run had uploaded it.
    pub fn insert(&self, bucket: &str, object: &str, data: impl Into<Bytes>) {
        self.lock()
            .insert((bucket.to_string(), object.to_string()), data.into());
    }

    pub fn get(&self, bucket: &str, object: &str) -> Option<Bytes> {
        self.lock()
            .get(&(bucket.to_string(), object.to_string()))
            .cloned()
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), Bytes>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key(bucket: &Bucket, object: &ObjectName) -> (String, String) {
        (bucket.name().to_string(), object.to_string())
    }
}

impl FromCredentials for MemoryClient {
    fn from_credentials(_credentials: &Credentials) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl StorageClient for MemoryClient {
    async fn object_exists(&self, bucket: &Bucket, object: &ObjectName) -> Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.lock().contains_key(&Self::key(bucket, object)))
    }

    async fn upload_file(&self, bucket: &Bucket, object: &ObjectName, path: &Path) -> Result<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::file_access(path, e))?;
        self.lock().insert(Self::key(bucket, object), Bytes::from(data));
        Ok(())
    }

    fn public_url(&self, bucket: &Bucket, object: &ObjectName) -> Result<String> {
        Ok(format!("memory://{}/{}", bucket.name(), object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::BucketName;

    #[tokio::test]
    async fn memory_client_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, b"world").unwrap();

        let client = MemoryClient::new();
        let bucket = client.bucket(&BucketName::new("test").unwrap());
        let object = ObjectName::new("hello.txt");

        assert!(!client.object_exists(&bucket, &object).await.unwrap());
        client.upload_file(&bucket, &object, &path).await.unwrap();
        assert!(client.object_exists(&bucket, &object).await.unwrap());

        assert_eq!(client.get("test", "hello.txt").unwrap(), Bytes::from_static(b"world"));
        assert_eq!(client.exists_calls(), 2);
        assert_eq!(client.upload_calls(), 1);
        assert_eq!(
            client.public_url(&bucket, &object).unwrap(),
            "memory://test/hello.txt"
        );
    }

    #[tokio::test]
    async fn upload_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let client = MemoryClient::new();
        let bucket = client.bucket(&BucketName::new("test").unwrap());

        let err = client
            .upload_file(&bucket, &ObjectName::new("gone"), &dir.path().join("gone"))
            .await
            .unwrap_err();
        assert!(err.is_file_access());
        assert!(client.get("test", "gone").is_none());
    }
}
