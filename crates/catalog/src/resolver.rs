//! Cached identifier ↔ record resolution.

use std::collections::HashMap;

use crate::{Asset, AssetId, Scene, SceneId};

/// Authoritative lookup of assets and scenes (the asset database of whatever
/// engine hosts the audit).
///
/// Lookups are assumed to be expensive and are only performed on cache misses
/// by [`AssetResolver`]. Returning `None` means the identifier no longer maps
/// to a live record (deleted or moved out of the project).
pub trait AssetSource {
    fn asset(&self, id: &AssetId) -> Option<Asset>;
    fn scene(&self, id: &SceneId) -> Option<Scene>;
}

/// Bidirectional cache in front of an [`AssetSource`].
///
/// A miss asks the source once and caches the record on success. Failed
/// lookups are *not* cached: an unresolved identifier is retried on every call
/// until it resolves, so a re-imported asset shows up without an explicit
/// [`clear`](Self::clear). Unresolved identifiers are never an error; callers
/// are expected to skip the entry.
///
/// Records are cached until [`clear`](Self::clear) is called.
pub struct AssetResolver {
    source: Box<dyn AssetSource>,
    assets: HashMap<AssetId, Asset>,
    scenes: HashMap<SceneId, Scene>,
    // Reverse directions, filled in as records are cached.
    assets_by_image: HashMap<String, Vec<AssetId>>,
    scenes_by_path: HashMap<String, SceneId>,
}
impl AssetResolver {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            assets: HashMap::new(),
            scenes: HashMap::new(),
            assets_by_image: HashMap::new(),
            scenes_by_path: HashMap::new(),
        }
    }

    pub fn resolve_asset(&mut self, id: &AssetId) -> Option<&Asset> {
        if !self.assets.contains_key(id) {
            let Some(asset) = self.source.asset(id) else {
                tracing::debug!(asset = %id, "Asset could not be resolved");
                return None;
            };
            self.assets_by_image.entry(asset.image.clone()).or_default().push(id.clone());
            self.assets.insert(id.clone(), asset);
        }
        self.assets.get(id)
    }

    pub fn resolve_scene(&mut self, id: &SceneId) -> Option<&Scene> {
        // Transient contexts have nothing on disk to resolve to; don't bother
        // the source with them.
        if id.is_unresolved() {
            return None;
        }
        if !self.scenes.contains_key(id) {
            let Some(scene) = self.source.scene(id) else {
                tracing::debug!(scene = %id, "Scene could not be resolved");
                return None;
            };
            self.scenes_by_path.insert(scene.path.clone(), id.clone());
            self.scenes.insert(id.clone(), scene);
        }
        self.scenes.get(id)
    }

    /// Identifiers of every cached sprite cut from `image`.
    ///
    /// Only reflects records that have already been resolved.
    pub fn assets_for_image(&self, image: &str) -> &[AssetId] {
        self.assets_by_image.get(image).map(Vec::as_slice).unwrap_or_default()
    }

    /// Identifier of the cached scene stored at `path`.
    pub fn scene_for_path(&self, path: &str) -> Option<&SceneId> {
        self.scenes_by_path.get(path)
    }

    pub fn cached_assets(&self) -> usize {
        self.assets.len()
    }

    pub fn cached_scenes(&self) -> usize {
        self.scenes.len()
    }

    /// Drop every cached record, in both directions.
    pub fn clear(&mut self) {
        self.assets.clear();
        self.scenes.clear();
        self.assets_by_image.clear();
        self.scenes_by_path.clear();
    }
}
