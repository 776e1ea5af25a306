//! Derived cross-reference views over the recorded usage.

use std::collections::{BTreeMap, BTreeSet};

use spritescope_atlas::{AtlasId, AtlasMembershipIndex};
use spritescope_catalog::{AssetId, AssetResolver, SceneId};
use tracing::{debug, instrument, warn};

use crate::flags::UsageFlag;
use crate::recorder::UsageRecorder;

static EMPTY_BUCKET: SceneBucket = SceneBucket {
    atlases: BTreeMap::new(),
    atlasless: BTreeSet::new(),
};
static EMPTY_SCENES: BTreeSet<SceneId> = BTreeSet::new();
static EMPTY_PATHS: BTreeSet<String> = BTreeSet::new();

/// Assets used in one scene, grouped by the atlas that packs them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneBucket {
    pub atlases: BTreeMap<AtlasId, BTreeSet<AssetId>>,
    /// Assets that aren't packed into any atlas.
    pub atlasless: BTreeSet<AssetId>,
}
impl SceneBucket {
    fn insert(&mut self, asset: &AssetId, atlas: Option<&AtlasId>) {
        match atlas {
            Some(atlas) => {
                self.atlases.entry(atlas.clone()).or_default().insert(asset.clone());
            },
            None => {
                self.atlasless.insert(asset.clone());
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty() && self.atlasless.is_empty()
    }
}

/// Snapshot of every derived view, replaced wholesale on rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageViews {
    scenes: BTreeMap<SceneId, SceneBucket>,
    dont_destroy: SceneBucket,
    scenes_by_asset: BTreeMap<AssetId, BTreeSet<SceneId>>,
    paths_by_asset: BTreeMap<AssetId, BTreeSet<String>>,
}

impl UsageViews {
    pub fn scene(&self, scene: &SceneId) -> &SceneBucket {
        self.scenes.get(scene).unwrap_or(&EMPTY_BUCKET)
    }

    pub fn scenes(&self) -> impl Iterator<Item = (&SceneId, &SceneBucket)> {
        self.scenes.iter()
    }

    /// Assets observed in transient contexts that don't belong to any scene.
    pub fn dont_destroy(&self) -> &SceneBucket {
        &self.dont_destroy
    }

    pub fn scenes_for_asset(&self, asset: &AssetId) -> &BTreeSet<SceneId> {
        self.scenes_by_asset.get(asset).unwrap_or(&EMPTY_SCENES)
    }

    pub fn paths_for_asset(&self, asset: &AssetId) -> &BTreeSet<String> {
        self.paths_by_asset.get(asset).unwrap_or(&EMPTY_PATHS)
    }
}

/// Owner of the derived views and their dirty flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageAggregator {
    views: UsageViews,
    dirty: bool,
}

impl Default for UsageAggregator {
    fn default() -> Self {
        Self {
            views: UsageViews::default(),
            dirty: true,
        }
    }
}

impl UsageAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The views as of the last rebuild. May be stale if [`is_dirty`](Self::is_dirty).
    pub fn views(&self) -> &UsageViews {
        &self.views
    }

    /// Recompute the views if dirty. Returns `true` if a rebuild happened.
    ///
    /// Assets that don't resolve are left out entirely, as are scenes that
    /// don't resolve; both are retried on the next rebuild.
    #[instrument(skip_all)]
    pub fn rebuild(
        &mut self,
        recorder: &UsageRecorder,
        resolver: &mut AssetResolver,
        atlases: &AtlasMembershipIndex,
    ) -> bool {
        if !self.dirty {
            return false;
        }
        let mut views = UsageViews::default();
        for summary in recorder.summaries() {
            let asset = summary.asset();
            if resolver.resolve_asset(asset).is_none() {
                warn!(asset = %asset, "Skipping usage of unresolvable asset");
                continue;
            }
            let atlas = atlases.atlas_for_asset(asset).map(|group| &group.id);
            if summary.flags().contains(UsageFlag::UsedInUnresolvedScene) {
                views.dont_destroy.insert(asset, atlas);
            }
            let scenes = views.scenes_by_asset.entry(asset.clone()).or_default();
            for scene in summary.scenes() {
                if resolver.resolve_scene(scene).is_none() {
                    warn!(asset = %asset, scene = %scene, "Skipping usage in unresolvable scene");
                    continue;
                }
                views.scenes.entry(scene.clone()).or_default().insert(asset, atlas);
                scenes.insert(scene.clone());
            }
            views
                .paths_by_asset
                .entry(asset.clone())
                .or_default()
                .extend(summary.paths().iter().cloned());
        }
        debug!(scenes = views.scenes.len(), assets = views.paths_by_asset.len(), "Rebuilt usage views");
        self.views = views;
        self.dirty = false;
        true
    }
}
