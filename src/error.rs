use thiserror::Error;

/// Errors surfaced by the storage subsystem.
///
/// Backend SDK detail (error codes, request ids) is logged at the point of
/// failure and never carried in these variants, so callers at the service
/// boundary only ever see a generic, category-labelled failure.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Startup configuration is missing or invalid. Fatal.
    #[error("invalid storage configuration: {0}")]
    Configuration(#[from] config::ConfigError),

    /// The bucket-existence probe failed during startup. Fatal unless the
    /// deployment opted into `skip_bucket_check`.
    #[error("could not reach the storage backend; make sure the bucket `{bucket}` exists")]
    BackendUnreachable { bucket: String },

    /// The uploaded payload could not be decoded as an image.
    #[error("the uploaded file could not be decoded as an image")]
    Transcode(#[source] image::ImageError),

    /// A backend write failed. Detail is in the logs.
    #[error("there was an error while uploading the file")]
    Upload,

    /// A single-object delete failed.
    #[error("there was an error while deleting the file: {path}")]
    Deletion { path: String },

    /// A prefix delete failed, possibly after removing some objects.
    #[error("there was an error while deleting the folder: {prefix}")]
    FolderDeletion { prefix: String },
}
