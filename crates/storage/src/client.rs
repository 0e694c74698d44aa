use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use gcp_upload_core::{
    Bucket, Credentials, Error, FromCredentials, ObjectName, Result, StorageClient,
};
use object_store::gcp::{GoogleCloudStorage, GoogleCloudStorageBuilder};
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, ClientOptions, ObjectStore, PutOptions, PutPayload, RetryConfig};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

use crate::config::GcsConfig;

pub const PUBLIC_BASE: &str = "https://storage.googleapis.com";

/// Everything but unreserved characters and `/` is escaped in public URLs.
const PUBLIC_URL_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Google Cloud Storage through [`object_store`].
///
/// One store is built per bucket on first use and kept for the life of the
/// client, so the access token fetched for the existence check is reused by
/// the upload.
pub struct GcsClient {
    config: GcsConfig,
    service_account_key: String,
    stores: Mutex<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl GcsClient {
    pub fn new(config: GcsConfig, credentials: &Credentials) -> Result<Self> {
        let service_account_key = service_account_key(&config, credentials)?;
        Ok(Self {
            config,
            service_account_key,
            stores: Mutex::new(HashMap::new()),
        })
    }

    fn store(&self, bucket: &Bucket) -> Result<Arc<dyn ObjectStore>> {
        let name = bucket.name().as_str();
        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = stores.get(name) {
            return Ok(Arc::clone(store));
        }
        let store: Arc<dyn ObjectStore> = Arc::new(self.build_store(name)?);
        stores.insert(name.to_string(), Arc::clone(&store));
        Ok(store)
    }

    /// Parses the private key; makes no request.
    fn build_store(&self, bucket: &str) -> Result<GoogleCloudStorage> {
        let mut options = ClientOptions::new().with_timeout(self.config.timeout);
        if self.config.is_emulator() {
            options = options.with_allow_http(true);
        }
        GoogleCloudStorageBuilder::new()
            .with_bucket_name(bucket)
            .with_service_account_key(self.service_account_key.as_str())
            .with_client_options(options)
            .with_retry(RetryConfig {
                max_retries: 0,
                ..Default::default()
            })
            .build()
            .map_err(|e| {
                Error::configuration(format!("cannot create storage client for {bucket}: {e}"))
            })
    }
}

impl FromCredentials for GcsClient {
    fn from_credentials(credentials: &Credentials) -> Result<Self> {
        Self::new(GcsConfig::default(), credentials)
    }
}

/// The service-account JSON handed to `object_store`. For an emulator the
/// base URL is overridden and OAuth switched off.
fn service_account_key(config: &GcsConfig, credentials: &Credentials) -> Result<String> {
    let mut info = credentials.info().clone();
    if let (Some(endpoint), Some(fields)) = (&config.endpoint, info.as_object_mut()) {
        fields.insert("gcs_base_url".to_string(), endpoint.as_str().into());
        fields.insert("disable_oauth".to_string(), true.into());
    }
    serde_json::to_string(&info)
        .map_err(|e| Error::configuration(format!("cannot serialize service account key: {e}")))
}

fn object_path(object: &ObjectName) -> Result<ObjectPath> {
    ObjectPath::parse(object.as_str())
        .map_err(|e| Error::configuration(format!("invalid object name {object}: {e}")))
}

fn remote_error(context: String, err: object_store::Error) -> Error {
    let status = match &err {
        object_store::Error::NotFound { .. } => Some(404),
        object_store::Error::PermissionDenied { .. } => Some(403),
        object_store::Error::Unauthenticated { .. } => Some(401),
        object_store::Error::Precondition { .. } => Some(412),
        _ => None,
    };
    Error::remote(context, status, err.to_string())
}

/// Canonical public URL of an object; `/` in the name is kept as a separator.
pub fn public_url(bucket: &str, object: &str) -> String {
    format!(
        "{PUBLIC_BASE}/{bucket}/{}",
        utf8_percent_encode(object, PUBLIC_URL_ESCAPE)
    )
}

#[async_trait]
impl StorageClient for GcsClient {
    async fn object_exists(&self, bucket: &Bucket, object: &ObjectName) -> Result<bool> {
        let store = self.store(bucket)?;
        let path = object_path(object)?;
        match store.head(&path).await {
            Ok(meta) => {
                debug!(location = %meta.location, size = meta.size, "Object metadata found");
                Ok(true)
            }
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(remote_error(
                format!("metadata lookup for gs://{}/{object}", bucket.name()),
                e,
            )),
        }
    }

    async fn upload_file(&self, bucket: &Bucket, object: &ObjectName, path: &Path) -> Result<()> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::file_access(path, e))?;
        let store = self.store(bucket)?;
        let location = object_path(object)?;
        let content_type = mime_guess::from_path(path).first_or_octet_stream();
        let size = data.len();

        let mut opts = PutOptions::default();
        opts.attributes
            .insert(Attribute::ContentType, content_type.to_string().into());
        let result = store
            .put_opts(&location, PutPayload::from(data), opts)
            .await
            .map_err(|e| {
                remote_error(
                    format!("upload of {} to gs://{}/{object}", path.display(), bucket.name()),
                    e,
                )
            })?;

        debug!(
            location = %location,
            size,
            content_type = %content_type,
            e_tag = result.e_tag.as_deref().unwrap_or("?"),
            "Stored object"
        );
        Ok(())
    }

    fn public_url(&self, bucket: &Bucket, object: &ObjectName) -> Result<String> {
        Ok(public_url(bucket.name().as_str(), object.as_str()))
    }
}
