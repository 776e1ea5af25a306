use std::collections::{BTreeMap, BTreeSet};

use exn::ResultExt;
use spritescope_atlas::{AtlasId, AtlasMembershipIndex, PackingSource};
use spritescope_catalog::{AssetId, AssetResolver, AssetSource, SceneId};
use spritescope_config::Config;
use tracing::{debug, info};

use crate::aggregator::{SceneBucket, UsageAggregator, UsageViews};
use crate::diagnostics::{self, ResizeSuggestion};
use crate::error::{ErrorKind, Result};
use crate::flags::FlagSet;
use crate::persist::{self, SettingsStore};
use crate::recorder::{Recorded, UsageObservation, UsageRecorder};
use crate::summary::AssetUsageSummary;

/// A sprite usage database: raw observations plus every cache and derived
/// view built from them.
///
/// Each database owns its own resolver, membership index and views, so any
/// number of them can live side by side. Derived state is only recomputed on
/// demand: call [`rebuild_views`](Self::rebuild_views) (as often as you like,
/// it's a no-op when nothing changed) before reading the views.
pub struct UsageDatabase {
    resolver: AssetResolver,
    packing: Box<dyn PackingSource>,
    atlases: AtlasMembershipIndex,
    recorder: UsageRecorder,
    aggregator: UsageAggregator,
    threshold: f32,
    storage_key: String,
}

impl UsageDatabase {
    pub fn new(source: impl AssetSource + 'static, packing: impl PackingSource + 'static) -> Self {
        Self::from_parts(source, packing, &Config::default())
    }

    /// Returns [`ErrorKind::InvalidConfig`] if `config` doesn't validate.
    pub fn with_config(
        source: impl AssetSource + 'static,
        packing: impl PackingSource + 'static,
        config: &Config,
    ) -> Result<Self> {
        config.validate().or_raise(|| ErrorKind::InvalidConfig)?;
        Ok(Self::from_parts(source, packing, config))
    }

    fn from_parts(source: impl AssetSource + 'static, packing: impl PackingSource + 'static, config: &Config) -> Self {
        Self {
            resolver: AssetResolver::new(source),
            packing: Box::new(packing),
            atlases: AtlasMembershipIndex::new(),
            recorder: UsageRecorder::new(),
            aggregator: UsageAggregator::new(),
            threshold: config.diagnostics.size_threshold,
            storage_key: config.persistence.key.clone(),
        }
    }

    /// Relative size deviation above which a sprite is flagged.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn record(&mut self, observation: UsageObservation) -> Recorded {
        let recorded = self.recorder.record(observation);
        if recorded.is_change() {
            self.aggregator.mark_dirty();
        }
        recorded
    }

    /// Bring the views up to date and return them.
    ///
    /// Builds atlas membership first if it was never built or was invalidated.
    pub fn rebuild_views(&mut self) -> &UsageViews {
        self.atlases.ensure_built(self.packing.as_ref());
        self.aggregator.rebuild(&self.recorder, &mut self.resolver, &self.atlases);
        self.aggregator.views()
    }

    /// The views as of the last [`rebuild_views`](Self::rebuild_views).
    pub fn views(&self) -> &UsageViews {
        self.aggregator.views()
    }

    pub fn views_are_dirty(&self) -> bool {
        self.aggregator.is_dirty()
    }

    pub fn scene_atlases(&self, scene: &SceneId) -> &BTreeMap<AtlasId, BTreeSet<AssetId>> {
        &self.views().scene(scene).atlases
    }

    pub fn scene_atlasless(&self, scene: &SceneId) -> &BTreeSet<AssetId> {
        &self.views().scene(scene).atlasless
    }

    pub fn scenes_for_asset(&self, asset: &AssetId) -> &BTreeSet<SceneId> {
        self.views().scenes_for_asset(asset)
    }

    pub fn paths_for_asset(&self, asset: &AssetId) -> &BTreeSet<String> {
        self.views().paths_for_asset(asset)
    }

    pub fn dont_destroy(&self) -> &SceneBucket {
        self.views().dont_destroy()
    }

    pub fn summary(&self, asset: &AssetId) -> Option<&AssetUsageSummary> {
        self.recorder.summary(asset)
    }

    pub fn summaries(&self) -> impl Iterator<Item = &AssetUsageSummary> {
        self.recorder.summaries()
    }

    /// Diagnostic flags for an asset. Empty if nothing was recorded for it or
    /// it doesn't resolve.
    pub fn diagnostics(&mut self, asset: &AssetId) -> FlagSet {
        let Some(summary) = self.recorder.summary(asset) else {
            return FlagSet::new();
        };
        match self.resolver.resolve_asset(asset) {
            Some(resolved) => diagnostics::evaluate(summary, resolved, self.threshold),
            None => FlagSet::new(),
        }
    }

    /// Members of an atlas that were never seen in use.
    pub fn unused_in_atlas(&mut self, atlas: &AtlasId) -> BTreeSet<AssetId> {
        self.atlases.ensure_built(self.packing.as_ref());
        self.atlases
            .members_of(atlas)
            .into_iter()
            .filter(|asset| !self.recorder.is_used(asset))
            .collect()
    }

    pub fn atlases(&self) -> &AtlasMembershipIndex {
        &self.atlases
    }

    pub fn prepare_for_new_run(&mut self) {
        debug!(assets = self.recorder.len(), "Preparing for new recording run");
        self.recorder.prepare_for_new_run();
    }

    pub fn clear_all(&mut self) {
        info!(assets = self.recorder.len(), "Clearing all usage data");
        self.recorder.clear();
        self.aggregator.mark_dirty();
    }

    /// Mark atlas membership stale. It's rebuilt the next time it's needed;
    /// existing views keep their atlas bucketing until they're invalidated.
    pub fn invalidate_atlases(&mut self) {
        self.atlases.invalidate();
    }

    /// Rebuild atlas membership right away.
    pub fn refresh_atlases(&mut self) {
        self.atlases.rebuild(self.packing.as_ref());
    }

    pub fn invalidate_views(&mut self) {
        self.aggregator.mark_dirty();
    }

    /// Forget every cached asset and scene lookup.
    pub fn clear_caches(&mut self) {
        self.resolver.clear();
        self.aggregator.mark_dirty();
    }

    /// Persist the raw observations under the configured key.
    pub fn save(&self, store: &mut impl SettingsStore) -> Result<()> {
        let blob = persist::encode(&self.recorder)?;
        debug!(key = %self.storage_key, bytes = blob.len(), "Saving usage data");
        store.set(&self.storage_key, blob);
        Ok(())
    }

    /// Replace the raw observations with what's persisted under the
    /// configured key. Unreadable data loads as empty.
    pub fn load(&mut self, store: &impl SettingsStore) {
        self.recorder = persist::decode(store.get(&self.storage_key).as_deref());
        debug!(key = %self.storage_key, assets = self.recorder.len(), "Loaded usage data");
        self.aggregator.mark_dirty();
    }

    pub fn suggest_resize(&mut self, asset: &AssetId) -> Result<ResizeSuggestion> {
        let Some(summary) = self.recorder.summary(asset) else {
            exn::bail!(ErrorKind::UnknownAsset(asset.to_string()));
        };
        let Some(resolved) = self.resolver.resolve_asset(asset) else {
            exn::bail!(ErrorKind::UnknownAsset(asset.to_string()));
        };
        diagnostics::suggest_resize(summary, resolved, self.threshold)
    }
}
