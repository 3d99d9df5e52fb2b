//=========================================================================
// Resource System
//=========================================================================
//
// Background asset loading with progress reporting.
//
// Architecture:
// ```text
//   AssetSource::list()            (directory walk / packaged entries)
//        │
//        ▼
//   ResourceLoader thread ── for each path ──> FormatLoader (by extension)
//        │                                         │
//        │  files_loaded / last_loaded  <──────────┘ decoded Resource
//        ▼
//   ResourceStore (immutable) ──OnceLock──> readers
//        │
//        └─ finish.fire()
// ```
//
// The store is published before `finish` fires, so a finish subscriber
// (or anyone observing `is_finished`) always sees the complete store.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod format;
pub mod source;
mod early_assets;
mod resource_loader;

//=== Public API ==========================================================

pub use early_assets::EarlyAssets;
pub use format::{
    default_loaders, file_extension, FontData, FontFormat, FontLoader, FormatLoader, ImageLoader,
};
pub use resource_loader::ResourceLoader;
pub use source::{AssetSource, DirectorySource, MemorySource};

//=== External Dependencies ===============================================

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::render::PixelBuffer;

//=== Resource ============================================================

/// A decoded asset.
#[derive(Clone)]
pub enum Resource {
    Image(Arc<PixelBuffer>),
    Font(Arc<FontData>),
    /// Produced by application-registered loaders.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(image) => f.debug_tuple("Image").field(image).finish(),
            Self::Font(font) => f.debug_tuple("Font").field(font).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

//=== ResourceStore =======================================================

/// Decoded assets keyed by their source path (forward slashes, relative
/// to the asset root).
#[derive(Debug, Default, Clone)]
pub struct ResourceStore {
    entries: HashMap<String, Resource>,
}

impl ResourceStore {
    /// Inserts a resource. Each path is written once; later inserts for
    /// the same path are rejected (returns `false`).
    pub(crate) fn insert(&mut self, path: &str, resource: Resource) -> bool {
        if self.entries.contains_key(path) {
            return false;
        }
        self.entries.insert(path.to_owned(), resource);
        true
    }

    //--- Lookups ----------------------------------------------------------

    pub fn get(&self, path: &str) -> Option<&Resource> {
        self.entries.get(path)
    }

    pub fn image(&self, path: &str) -> Option<Arc<PixelBuffer>> {
        match self.entries.get(path)? {
            Resource::Image(image) => Some(Arc::clone(image)),
            _ => None,
        }
    }

    pub fn font(&self, path: &str) -> Option<Arc<FontData>> {
        match self.entries.get(path)? {
            Resource::Font(font) => Some(Arc::clone(font)),
            _ => None,
        }
    }

    /// Custom resource of type `T`; `None` if absent or of another type.
    pub fn custom<T: Any + Send + Sync>(&self, path: &str) -> Option<Arc<T>> {
        match self.entries.get(path)? {
            Resource::Custom(value) => Arc::clone(value).downcast::<T>().ok(),
            _ => None,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}

//=== Errors ==============================================================

/// Failure to load one asset. Logged and skipped by the loader.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read asset: {0}")]
    Io(#[from] io::Error),

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("unrecognized font signature {0:02x?}")]
    InvalidFont([u8; 4]),

    #[error("{0}")]
    Decode(String),
}

/// Failure to start the background loader.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("resource loading has already been started")]
    AlreadyStarted,

    #[error("failed to spawn resource loader thread: {0}")]
    ThreadSpawn(#[source] io::Error),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::Color;

    fn image() -> Resource {
        Resource::Image(Arc::new(PixelBuffer::filled(1, 1, Color::RED)))
    }

    #[test]
    fn store_is_write_once_per_path() {
        let mut store = ResourceStore::default();

        assert!(store.insert("a.png", image()));
        assert!(!store.insert("a.png", Resource::Custom(Arc::new(1u8))));

        assert!(store.image("a.png").is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn typed_getters_reject_other_kinds() {
        let mut store = ResourceStore::default();
        store.insert("a.png", image());
        store.insert("level.json", Resource::Custom(Arc::new(String::from("{}"))));

        assert!(store.font("a.png").is_none());
        assert!(store.image("level.json").is_none());
        assert!(store.custom::<u32>("level.json").is_none());
        assert_eq!(store.custom::<String>("level.json").as_deref().map(String::as_str), Some("{}"));
        assert!(store.image("missing.png").is_none());
    }

    #[test]
    fn paths_are_sorted() {
        let mut store = ResourceStore::default();
        store.insert("b.png", image());
        store.insert("a.png", image());

        assert_eq!(store.paths(), vec!["a.png", "b.png"]);
    }

    #[test]
    fn resource_debug_hides_custom_payload() {
        let custom = Resource::Custom(Arc::new(5i32));
        assert_eq!(format!("{:?}", custom), "Custom(..)");
    }

    #[test]
    fn load_error_messages() {
        let err = LoadError::InvalidFont(*b"abcd");
        assert!(err.to_string().contains("unrecognized font signature"));
        assert_eq!(
            LoaderError::AlreadyStarted.to_string(),
            "resource loading has already been started"
        );
    }
}
