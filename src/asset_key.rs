use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Category of a stored user asset.
///
/// The category is fixed at upload time and determines the key's path
/// segment, file extension and content metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    /// Profile pictures, stored as JPEG
    #[serde(rename = "pictures")]
    Picture,
    /// Resume preview images, stored as JPEG
    #[serde(rename = "previews")]
    Preview,
    /// Exported resume documents, stored as PDF
    #[serde(rename = "resumes")]
    Resume,
}

impl AssetCategory {
    /// Path segment used in storage keys and public URLs.
    pub fn path_segment(&self) -> &'static str {
        match self {
            AssetCategory::Picture => "pictures",
            AssetCategory::Preview => "previews",
            AssetCategory::Resume => "resumes",
        }
    }

    /// File extension for this category. Total rule, no error path.
    pub fn extension(&self) -> &'static str {
        match self {
            AssetCategory::Resume => "pdf",
            AssetCategory::Picture | AssetCategory::Preview => "jpg",
        }
    }

    /// Whether payloads in this category go through the image transcoder.
    pub fn is_image(&self) -> bool {
        matches!(self, AssetCategory::Picture | AssetCategory::Preview)
    }

    /// Content type persisted alongside objects of this category.
    pub fn content_type(&self) -> &'static str {
        match self {
            AssetCategory::Resume => "application/pdf",
            AssetCategory::Picture | AssetCategory::Preview => "image/jpeg",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for AssetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pictures" => Ok(AssetCategory::Picture),
            "previews" => Ok(AssetCategory::Preview),
            "resumes" => Ok(AssetCategory::Resume),
            other => Err(format!("unknown asset category: {other}")),
        }
    }
}

/// Deterministic key identifying one object in the bucket.
///
/// The same (owner, category, name) triple always renders to the same path;
/// uniqueness across owners comes from namespacing on `owner_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKey {
    owner_id: String,
    category: AssetCategory,
    name: String,
}

impl StorageKey {
    /// Derive a key for the given owner and category.
    ///
    /// `owner_id` must be non-empty. When `name` is `None` a fresh
    /// collision-resistant id is generated, as done for newly uploaded
    /// images; deletions always pass the previously assigned name.
    pub fn new(owner_id: &str, category: AssetCategory, name: Option<&str>) -> Self {
        let name = match name {
            Some(name) => name.to_string(),
            None => Uuid::new_v4().simple().to_string(),
        };

        Self {
            owner_id: owner_id.to_string(),
            category,
            name,
        }
    }

    /// The asset name, without extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the key as `{owner_id}/{category}/{name}.{extension}`.
    pub fn path(&self) -> String {
        format!(
            "{}/{}/{}.{}",
            self.owner_id,
            self.category.path_segment(),
            self.name,
            self.category.extension()
        )
    }

    /// Content type for the object stored at this key.
    pub fn content_type(&self) -> &'static str {
        self.category.content_type()
    }

    /// Content disposition for the object stored at this key.
    ///
    /// PDFs are served as attachment downloads named after the asset;
    /// images carry no disposition header.
    pub fn content_disposition(&self) -> Option<String> {
        match self.category {
            AssetCategory::Resume => Some(format!(
                "attachment; filename={}.{}",
                self.name,
                self.category.extension()
            )),
            AssetCategory::Picture | AssetCategory::Preview => None,
        }
    }
}

/// Public URL for an object path.
///
/// The `https://{bucket}.s3.{region}.amazonaws.com/{path}` shape is a
/// bit-exact contract other subsystems construct links from.
pub fn public_url(bucket: &str, region: &str, path: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{path}")
}
