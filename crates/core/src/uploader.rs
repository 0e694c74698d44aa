use std::path::Path;

use tracing::debug;

use crate::client::StorageClient;
use crate::error::Result;
use crate::object::{BucketName, ObjectName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Uploaded,
    /// An object with the same name was already in the bucket.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub object: ObjectName,
    pub public_url: String,
    pub status: UploadStatus,
}

impl UploadOutcome {
    pub fn skipped(&self) -> bool {
        self.status == UploadStatus::Skipped
    }
}

/// Uploads files to a bucket unless an object of the same name is present.
pub struct BucketUploader<C> {
    client: C,
}

impl<C: StorageClient> BucketUploader<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn upload_to_bucket(
        &self,
        bucket_name: &str,
        filename: impl AsRef<Path>,
    ) -> Result<UploadOutcome> {
        upload_to_bucket(&self.client, bucket_name, filename.as_ref()).await
    }
}

/// Ensure `filename` exists in `bucket_name` under its base name and return
/// the object's public URL. Existing objects are never overwritten.
pub async fn upload_to_bucket<C: StorageClient + ?Sized>(
    client: &C,
    bucket_name: &str,
    filename: &Path,
) -> Result<UploadOutcome> {
    let bucket = client.bucket(&BucketName::new(bucket_name)?);
    let object = ObjectName::from_path(filename)?;

    let status = if client.object_exists(&bucket, &object).await? {
        debug!(bucket = %bucket.name(), object = %object, "Object already present, skipping upload");
        UploadStatus::Skipped
    } else {
        debug!(bucket = %bucket.name(), object = %object, path = %filename.display(), "Uploading");
        client.upload_file(&bucket, &object, filename).await?;
        debug!(bucket = %bucket.name(), object = %object, "Upload complete");
        UploadStatus::Uploaded
    };

    let public_url = client.public_url(&bucket, &object)?;
    Ok(UploadOutcome {
        object,
        public_url,
        status,
    })
}
