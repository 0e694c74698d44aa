use std::path::Path;

use async_trait::async_trait;

use crate::credentials::Credentials;
use crate::error::Result;
use crate::object::{BucketName, ObjectName};

/// Handle to a bucket. Obtaining one never touches the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    name: BucketName,
}

impl Bucket {
    pub fn new(name: BucketName) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &BucketName {
        &self.name
    }
}

/// Builds a client authenticated with a service account.
pub trait FromCredentials: Sized {
    fn from_credentials(credentials: &Credentials) -> Result<Self>;
}

/// The operations the uploader needs from an object store.
#[async_trait]
pub trait StorageClient: Send + Sync {
    fn bucket(&self, name: &BucketName) -> Bucket {
        Bucket::new(name.clone())
    }

    /// Metadata lookup; never compares content.
    async fn object_exists(&self, bucket: &Bucket, object: &ObjectName) -> Result<bool>;

    async fn upload_file(&self, bucket: &Bucket, object: &ObjectName, path: &Path) -> Result<()>;

    fn public_url(&self, bucket: &Bucket, object: &ObjectName) -> Result<String>;
}
