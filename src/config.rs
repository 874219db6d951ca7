use crate::error::StorageError;
use serde::Deserialize;

/// Storage backend configuration.
///
/// Region, credentials and bucket are required; deserialization fails with a
/// [`StorageError::Configuration`] before any network call when one is
/// missing.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// AWS region the bucket lives in
    pub region: String,
    /// Access key id for the bucket
    pub access_key_id: String,
    /// Secret access key for the bucket
    pub secret_access_key: String,
    /// Bucket name for asset storage
    pub bucket: String,
    /// Skip the bucket-existence probe at startup
    #[serde(default)]
    pub skip_bucket_check: bool,
    /// Custom endpoint URL (for MinIO, LocalStack, etc.)
    pub endpoint_url: Option<String>,
    /// Force path-style access (required for MinIO)
    #[serde(default)]
    pub force_path_style: bool,
}

impl StorageConfig {
    /// Load configuration from config files and environment.
    ///
    /// Sources, later ones overriding earlier: `config/storage.*` if present,
    /// then `STORAGE`-prefixed environment variables with `__` as the
    /// separator (`STORAGE__BUCKET`, `STORAGE__ACCESS_KEY_ID`, ...).
    pub fn load() -> Result<Self, StorageError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/storage").required(false))
            .add_source(
                config::Environment::with_prefix("STORAGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize().map_err(StorageError::from)
    }
}
