use crate::asset_key::AssetCategory;
use crate::error::StorageError;
use async_trait::async_trait;

/// Capability set the rest of the application depends on for asset storage.
///
/// Exactly one production implementation exists ([`crate::S3Storage`]);
/// [`crate::InMemoryStorage`] backs tests. Implementations are stateless
/// after construction, so a single shared instance serves concurrent
/// request-handling tasks without locking.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store an asset and return its public URL.
    ///
    /// Image categories are transcoded to bounded JPEG before the write;
    /// resumes are written byte-for-byte. When `name` is `None` a fresh id
    /// is generated. Uploading the same (owner, category, name) twice
    /// overwrites the prior object; no versioning is kept.
    async fn upload(
        &self,
        owner_id: &str,
        category: AssetCategory,
        data: &[u8],
        name: Option<&str>,
    ) -> Result<String, StorageError>;

    /// Delete one asset. Deleting a key that does not exist succeeds.
    async fn delete_object(
        &self,
        owner_id: &str,
        category: AssetCategory,
        name: &str,
    ) -> Result<(), StorageError>;

    /// Delete every object under `prefix`, conventionally `{owner_id}/` to
    /// purge all assets of one owner.
    ///
    /// A prefix with no matching objects is a successful no-op. Objects are
    /// deleted sequentially; the first failure aborts the operation and
    /// already-deleted objects are not restored.
    async fn delete_folder(&self, prefix: &str) -> Result<(), StorageError>;

    /// Whether the backend is reachable and the bucket exists.
    ///
    /// Never returns an error; failures are logged and reported as `false`.
    async fn is_healthy(&self) -> bool;
}
