pub mod client;
pub mod credentials;
pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod object;
pub mod uploader;

pub use client::{Bucket, FromCredentials, StorageClient};
pub use credentials::{CREDENTIALS_ENV, Credentials};
pub use error::{Error, Result};
pub use object::{BucketName, ObjectName};
pub use uploader::{BucketUploader, UploadOutcome, UploadStatus, upload_to_bucket};
