use crate::asset_key::{public_url, AssetCategory, StorageKey};
use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::object_store::ObjectStorage;
use crate::transcoder;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Builder as S3ConfigBuilder, Credentials};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use tracing::{debug, error, info, instrument, warn};

/// Production asset store backed by an S3 bucket.
///
/// Constructed once during process startup and shared (behind `Arc`) for the
/// process lifetime; the handle is immutable and holds only resolved
/// credentials, region and bucket name. Request timeouts and retries are the
/// SDK's own; no extra retry layer is added on top.
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    region: String,
}

impl S3Storage {
    /// Build the client and run the startup bucket-existence probe.
    ///
    /// With `skip_bucket_check` set the probe is skipped entirely and no
    /// network call is made; the deployer is then responsible for making the
    /// asset paths publicly reachable. Otherwise a failed probe is fatal and
    /// must abort startup.
    pub async fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "storage-config",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut s3_config_builder = S3ConfigBuilder::from(&aws_config);

        // Custom endpoint for MinIO/LocalStack
        if let Some(ref endpoint_url) = config.endpoint_url {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint_url);
        }

        if config.force_path_style {
            s3_config_builder = s3_config_builder.force_path_style(true);
        }

        let store = Self {
            client: S3Client::from_conf(s3_config_builder.build()),
            bucket: config.bucket.clone(),
            region: config.region.clone(),
        };

        if config.skip_bucket_check {
            warn!("Skipping the verification of whether the storage bucket exists");
            warn!(
                "Make sure that the following paths are publicly accessible: \
                 `/{{pictures,previews}}/*` and `/resumes/*`"
            );
            return Ok(store);
        }

        match store.client.head_bucket().bucket(&store.bucket).send().await {
            Ok(_) => {
                info!(
                    bucket = %store.bucket,
                    region = %store.region,
                    "Successfully connected to the storage backend"
                );
                Ok(store)
            }
            Err(error) => {
                error!(
                    bucket = %store.bucket,
                    error = %DisplayErrorContext(&error),
                    "Error connecting to the storage backend"
                );
                Err(StorageError::BackendUnreachable {
                    bucket: store.bucket,
                })
            }
        }
    }

    /// Bucket name this store writes to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Region the bucket lives in.
    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    #[instrument(skip(self, data), fields(category = %category))]
    async fn upload(
        &self,
        owner_id: &str,
        category: AssetCategory,
        data: &[u8],
        name: Option<&str>,
    ) -> Result<String, StorageError> {
        let key = StorageKey::new(owner_id, category, name);
        let path = key.path();

        let body = if category.is_image() {
            transcoder::transcode(data)?
        } else {
            data.to_vec()
        };

        debug!(path = %path, size_bytes = body.len(), "Uploading asset");

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&path)
            .body(ByteStream::from(body))
            .content_type(key.content_type());

        if let Some(disposition) = key.content_disposition() {
            request = request.content_disposition(disposition);
        }

        request.send().await.map_err(|error| {
            error!(
                path = %path,
                error = %DisplayErrorContext(&error),
                "Error uploading asset to the storage backend"
            );
            StorageError::Upload
        })?;

        Ok(public_url(&self.bucket, &self.region, &path))
    }

    #[instrument(skip(self), fields(category = %category))]
    async fn delete_object(
        &self,
        owner_id: &str,
        category: AssetCategory,
        name: &str,
    ) -> Result<(), StorageError> {
        let path = StorageKey::new(owner_id, category, Some(name)).path();

        // Deleting a missing key is a successful no-op in S3
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&path)
            .send()
            .await
            .map_err(|error| {
                error!(
                    path = %path,
                    error = %DisplayErrorContext(&error),
                    "Error deleting asset from the storage backend"
                );
                StorageError::Deletion { path: path.clone() }
            })?;

        debug!(path = %path, "Asset deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_folder(&self, prefix: &str) -> Result<(), StorageError> {
        let mut continuation_token: Option<String> = None;
        let mut deleted = 0usize;

        loop {
            let listing = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|error| {
                    error!(
                        prefix = %prefix,
                        error = %DisplayErrorContext(&error),
                        "Error listing folder contents"
                    );
                    StorageError::FolderDeletion {
                        prefix: prefix.to_string(),
                    }
                })?;

            for object in listing.contents() {
                let Some(key) = object.key() else { continue };

                self.client
                    .delete_object()
                    .bucket(&self.bucket)
                    .key(key)
                    .send()
                    .await
                    .map_err(|error| {
                        error!(
                            prefix = %prefix,
                            key = %key,
                            error = %DisplayErrorContext(&error),
                            "Error deleting object during folder deletion"
                        );
                        StorageError::FolderDeletion {
                            prefix: prefix.to_string(),
                        }
                    })?;
                deleted += 1;
            }

            // Follow continuation tokens so prefixes beyond one listing page
            // (1000 keys) are fully purged
            match listing.next_continuation_token() {
                Some(token) if listing.is_truncated() == Some(true) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        debug!(prefix = %prefix, deleted = deleted, "Folder deleted");
        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => true,
            Err(error) => {
                warn!(
                    bucket = %self.bucket,
                    error = %DisplayErrorContext(&error),
                    "Storage backend health probe failed"
                );
                false
            }
        }
    }
}
