use std::time::Duration;

use gcp_upload_core::{Error, Result};

/// Points the client at a local Cloud Storage emulator instead of Google.
pub const EMULATOR_HOST_ENV: &str = "STORAGE_EMULATOR_HOST";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct GcsConfig {
    /// Base URL of an emulator. `None` talks to Google with OAuth.
    pub endpoint: Option<String>,
    pub timeout: Duration,
}

impl Default for GcsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GcsConfig {
    /// Configuration for an emulator such as `localhost:9023`. Emulators do
    /// not check tokens, so requests are sent without one.
    pub fn emulator(host: &str) -> Result<Self> {
        let host = host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(Error::configuration("emulator host must not be empty"));
        }
        let endpoint = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };
        Ok(Self {
            endpoint: Some(endpoint),
            ..Self::default()
        })
    }

    pub fn is_emulator(&self) -> bool {
        self.endpoint.is_some()
    }
}
