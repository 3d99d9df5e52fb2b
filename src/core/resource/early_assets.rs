//=========================================================================
// Early Assets
//=========================================================================
//
// A handful of assets decoded synchronously before the background pass
// starts, so the loading screen has something to draw.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::Arc;

use log::{info, warn};

//=== Internal Dependencies ===============================================

use super::format::{load_asset, FormatLoader};
use super::{AssetSource, FontData, ResourceStore};
use crate::core::render::PixelBuffer;

//=== EarlyAssets =========================================================

/// Synchronously loaded assets, available before [`ResourceLoader`]
/// finishes.
///
/// [`ResourceLoader`]: super::ResourceLoader
#[derive(Debug, Clone, Default)]
pub struct EarlyAssets {
    store: Arc<ResourceStore>,
}

impl EarlyAssets {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads `paths` on the calling thread. Missing or undecodable files
    /// are logged and left out.
    pub fn load(
        source: &dyn AssetSource,
        loaders: &[Arc<dyn FormatLoader>],
        paths: &[&str],
    ) -> Self {
        let mut store = ResourceStore::default();

        for path in paths {
            match load_asset(source, loaders, path) {
                Some(resource) => {
                    store.insert(path, resource);
                }
                None => warn!("Early asset {} is unavailable", path),
            }
        }

        info!("Loaded {} of {} early assets", store.len(), paths.len());
        Self {
            store: Arc::new(store),
        }
    }

    pub fn image(&self, path: &str) -> Option<Arc<PixelBuffer>> {
        self.store.image(path)
    }

    pub fn font(&self, path: &str) -> Option<Arc<FontData>> {
        self.store.font(path)
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
