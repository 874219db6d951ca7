//! Asset Storage
//!
//! Object storage subsystem for user-owned binary assets: profile pictures,
//! resume preview images and exported resume PDFs. The HTTP layer, auth and
//! metadata persistence live elsewhere and call into this crate through the
//! [`ObjectStorage`] trait.
//!
//! ## Features
//!
//! - **Deterministic keys**: assets live at `{owner}/{category}/{name}.{ext}`,
//!   namespaced per owner, with category-driven extension and content metadata
//! - **Bounded image transcoding**: pictures and previews are re-encoded as
//!   JPEG with the larger dimension clamped to 600px
//! - **Prefix deletion**: purge every asset of one owner in a single call
//! - **Health probe**: bucket reachability as a plain boolean for the
//!   aggregate health endpoint, never an error
//!
//! ## Architecture
//!
//! ```text
//! Controller layer
//!       │
//!       ▼
//! ┌──────────────────┐     ┌──────────────┐
//! │ ObjectStorage    │────▶│ StorageKey / │
//! │ (trait)          │     │ Transcoder   │
//! └──────────────────┘     └──────────────┘
//!   │              │
//!   ▼              ▼
//! ┌───────────┐  ┌────────────────┐
//! │ S3Storage │  │ InMemoryStorage│
//! │ (bucket)  │  │ (tests)        │
//! └───────────┘  └────────────────┘
//! ```

pub mod asset_key;
pub mod config;
pub mod error;
pub mod memory_store;
pub mod object_store;
pub mod s3_store;
pub mod transcoder;

pub use asset_key::{public_url, AssetCategory, StorageKey};
pub use config::StorageConfig;
pub use error::StorageError;
pub use memory_store::{InMemoryStorage, StoredObject};
pub use object_store::ObjectStorage;
pub use s3_store::S3Storage;
