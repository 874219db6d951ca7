use crate::asset_key::{public_url, AssetCategory, StorageKey};
use crate::error::StorageError;
use crate::object_store::ObjectStorage;
use crate::transcoder;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// An object held by [`InMemoryStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
    pub content_disposition: Option<String>,
}

/// In-memory [`ObjectStorage`] implementation for tests.
///
/// Runs the same key scheme and transcoder as the production store so the
/// whole upload pipeline is exercised; only the backend writes are replaced
/// by a map. The `set_healthy` switch simulates an unreachable backend:
/// every operation then fails with the corresponding generic error and
/// `is_healthy` reports false.
pub struct InMemoryStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
    bucket: String,
    region: String,
    healthy: AtomicBool,
}

impl InMemoryStorage {
    pub fn new(bucket: &str, region: &str) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            bucket: bucket.to_string(),
            region: region.to_string(),
            healthy: AtomicBool::new(true),
        }
    }

    /// Toggle simulated backend reachability.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Fetch a stored object by its exact path.
    pub async fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    /// Whether an object exists at the exact path.
    pub async fn contains(&self, path: &str) -> bool {
        self.objects.read().await.contains_key(path)
    }

    /// All stored paths starting with `prefix`.
    pub async fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.objects
            .read()
            .await
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    fn reachable(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStorage for InMemoryStorage {
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

        if !self.reachable() {
            debug!(path = %path, "Simulated backend unreachable, failing upload");
            return Err(StorageError::Upload);
        }

        self.objects.write().await.insert(
            path.clone(),
            StoredObject {
                data: body,
                content_type: key.content_type().to_string(),
                content_disposition: key.content_disposition(),
            },
        );

        Ok(public_url(&self.bucket, &self.region, &path))
    }

    async fn delete_object(
        &self,
        owner_id: &str,
        category: AssetCategory,
        name: &str,
    ) -> Result<(), StorageError> {
        let path = StorageKey::new(owner_id, category, Some(name)).path();

        if !self.reachable() {
            return Err(StorageError::Deletion { path });
        }

        // Removing a missing key is a successful no-op
        self.objects.write().await.remove(&path);
        Ok(())
    }

    async fn delete_folder(&self, prefix: &str) -> Result<(), StorageError> {
        if !self.reachable() {
            return Err(StorageError::FolderDeletion {
                prefix: prefix.to_string(),
            });
        }

        let mut objects = self.objects.write().await;
        let matching: Vec<String> = objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        for key in matching {
            objects.remove(&key);
        }

        Ok(())
    }

    async fn is_healthy(&self) -> bool {
        self.reachable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_fixture(width: u32, height: u32) -> Vec<u8> {
        let image =
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([40, 90, 160])));
        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), ImageOutputFormat::Png)
            .unwrap();
        buffer
    }

    fn store() -> InMemoryStorage {
        InMemoryStorage::new("assets", "eu-west-1")
    }

    #[tokio::test]
    async fn test_resume_upload_is_stored_byte_for_byte() {
        let store = store();
        let payload = b"%PDF-1.7 fake resume".to_vec();

        let url = store
            .upload("u1", AssetCategory::Resume, &payload, Some("cv"))
            .await
            .unwrap();

        assert_eq!(url, "https://assets.s3.eu-west-1.amazonaws.com/u1/resumes/cv.pdf");

        let object = store.object("u1/resumes/cv.pdf").await.unwrap();
        assert_eq!(object.data, payload);
        assert_eq!(object.content_type, "application/pdf");
        assert_eq!(
            object.content_disposition.as_deref(),
            Some("attachment; filename=cv.pdf")
        );
    }

    #[tokio::test]
    async fn test_picture_upload_generates_name_and_transcodes() {
        let store = store();

        let url = store
            .upload("u1", AssetCategory::Picture, &png_fixture(1000, 500), None)
            .await
            .unwrap();

        assert!(url.starts_with("https://assets.s3.eu-west-1.amazonaws.com/u1/pictures/"));
        assert!(url.ends_with(".jpg"));

        let path = url
            .strip_prefix("https://assets.s3.eu-west-1.amazonaws.com/")
            .unwrap();
        let object = store.object(path).await.unwrap();
        assert_eq!(object.content_type, "image/jpeg");
        assert_eq!(object.content_disposition, None);

        let decoded = image::load_from_memory(&object.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (600, 300));
    }

    #[tokio::test]
    async fn test_corrupt_image_is_rejected_and_nothing_is_written() {
        let store = store();

        let result = store
            .upload("u1", AssetCategory::Picture, b"not an image", Some("a"))
            .await;

        assert!(matches!(result, Err(StorageError::Transcode(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_reupload_with_same_name_overwrites() {
        let store = store();

        let first = store
            .upload("u1", AssetCategory::Resume, b"v1", Some("cv"))
            .await
            .unwrap();
        let second = store
            .upload("u1", AssetCategory::Resume, b"v2", Some("cv"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.object("u1/resumes/cv.pdf").await.unwrap().data, b"v2");
    }

    #[tokio::test]
    async fn test_upload_then_delete_leaves_no_object() {
        let store = store();

        store
            .upload("u1", AssetCategory::Resume, b"bytes", Some("cv"))
            .await
            .unwrap();
        store
            .delete_object("u1", AssetCategory::Resume, "cv")
            .await
            .unwrap();

        assert!(!store.contains("u1/resumes/cv.pdf").await);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = store();

        store
            .delete_object("u1", AssetCategory::Picture, "missing")
            .await
            .unwrap();
        store
            .delete_object("u1", AssetCategory::Picture, "missing")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_folder_with_no_matches_is_a_noop() {
        let store = store();
        store.delete_folder("u1/").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_folder_purges_all_categories_of_one_owner() {
        let store = store();

        store
            .upload("u1", AssetCategory::Picture, &png_fixture(10, 10), Some("a"))
            .await
            .unwrap();
        store
            .upload("u1", AssetCategory::Resume, b"pdf", Some("b"))
            .await
            .unwrap();
        store
            .upload("u2", AssetCategory::Resume, b"pdf", Some("c"))
            .await
            .unwrap();

        store.delete_folder("u1/").await.unwrap();

        assert!(store.keys_with_prefix("u1/").await.is_empty());
        assert!(store.contains("u2/resumes/c.pdf").await);
    }

    #[tokio::test]
    async fn test_unreachable_backend_yields_false_not_an_error() {
        let store = store();
        store.set_healthy(false);

        assert!(!store.is_healthy().await);
        assert!(matches!(
            store
                .upload("u1", AssetCategory::Resume, b"pdf", Some("cv"))
                .await,
            Err(StorageError::Upload)
        ));
        assert!(matches!(
            store.delete_object("u1", AssetCategory::Resume, "cv").await,
            Err(StorageError::Deletion { .. })
        ));
        assert!(matches!(
            store.delete_folder("u1/").await,
            Err(StorageError::FolderDeletion { .. })
        ));

        store.set_healthy(true);
        assert!(store.is_healthy().await);
    }
}
