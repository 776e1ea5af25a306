//! In-memory asset source for testing.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::{Asset, AssetId, AssetSource, Scene, SceneId};

/// In-memory [`AssetSource`] for testing.
///
/// Clones share the same records, so a test can hand one clone to an
/// [`AssetResolver`](crate::AssetResolver) and keep another to delete assets
/// behind its back or count how often the source was consulted.
#[derive(Clone, Default)]
pub struct MockSource {
    inner: Rc<MockInner>,
}

#[derive(Default)]
struct MockInner {
    assets: RefCell<HashMap<AssetId, Asset>>,
    scenes: RefCell<HashMap<SceneId, Scene>>,
    lookups: Cell<usize>,
}

impl MockSource {
    pub fn with_assets(self, assets: impl IntoIterator<Item = Asset>) -> Self {
        for asset in assets {
            self.insert_asset(asset);
        }
        self
    }

    pub fn with_scenes(self, scenes: impl IntoIterator<Item = Scene>) -> Self {
        for scene in scenes {
            self.inner.scenes.borrow_mut().insert(scene.id.clone(), scene);
        }
        self
    }

    pub fn insert_asset(&self, asset: Asset) {
        self.inner.assets.borrow_mut().insert(asset.id.clone(), asset);
    }

    pub fn remove_asset(&self, id: &AssetId) {
        self.inner.assets.borrow_mut().remove(id);
    }

    pub fn remove_scene(&self, id: &SceneId) {
        self.inner.scenes.borrow_mut().remove(id);
    }

    /// Number of lookups (asset and scene) the source has answered.
    pub fn lookups(&self) -> usize {
        self.inner.lookups.get()
    }
}

impl AssetSource for MockSource {
    fn asset(&self, id: &AssetId) -> Option<Asset> {
        self.inner.lookups.set(self.inner.lookups.get() + 1);
        self.inner.assets.borrow().get(id).cloned()
    }

    fn scene(&self, id: &SceneId) -> Option<Scene> {
        self.inner.lookups.set(self.inner.lookups.get() + 1);
        self.inner.scenes.borrow().get(id).cloned()
    }
}
