use std::collections::BTreeSet;

use spritescope_catalog::{AssetId, ObservedSize, SceneId};

use crate::flags::{FlagSet, UsageFlag};
use crate::site::{SiteRecord, UsageSite, find_site};

/// Everything recorded about how one sprite is used.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetUsageSummary {
    pub(crate) asset: AssetId,
    pub(crate) sites: Vec<SiteRecord>,
    pub(crate) paths: BTreeSet<String>,
    pub(crate) scenes: BTreeSet<SceneId>,
    pub(crate) max_size: Option<ObservedSize>,
    pub(crate) flags: FlagSet,
    /// Set by "prepare for new run": the next observation starts the size
    /// tracking over. Never persisted.
    pub(crate) awaiting_run: bool,
}

impl AssetUsageSummary {
    pub(crate) fn new(asset: AssetId) -> Self {
        Self {
            asset,
            sites: Vec::new(),
            paths: BTreeSet::new(),
            scenes: BTreeSet::new(),
            max_size: None,
            flags: FlagSet::new(),
            awaiting_run: false,
        }
    }

    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    pub fn sites(&self) -> &[SiteRecord] {
        &self.sites
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Every distinct hierarchy path the sprite was observed at.
    pub fn paths(&self) -> &BTreeSet<String> {
        &self.paths
    }

    /// Persistent scenes the sprite was observed in. Never contains
    /// [`SceneId::Unresolved`]; see [`UsageFlag::UsedInUnresolvedScene`].
    pub fn scenes(&self) -> &BTreeSet<SceneId> {
        &self.scenes
    }

    /// Largest size (by magnitude) observed in the current run.
    pub fn max_size(&self) -> Option<ObservedSize> {
        self.max_size
    }

    /// Recording facts (not size verdicts, see
    /// [`diagnostics::evaluate`](crate::diagnostics::evaluate)).
    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Fold one observation in. Returns `true` if anything changed.
    pub(crate) fn observe(
        &mut self,
        scene: SceneId,
        site: UsageSite,
        path: String,
        size: Option<ObservedSize>,
    ) -> bool {
        let previous_size = self.max_size;
        let previously_blind = self.flags.contains(UsageFlag::CannotDiscoverSize);
        if std::mem::take(&mut self.awaiting_run) {
            self.max_size = None;
            self.flags.remove(UsageFlag::CannotDiscoverSize);
        }
        let site_changed = self.observe_site(site, path);
        let scene_changed = self.observe_scene(scene);
        self.observe_size(size);
        site_changed
            || scene_changed
            || self.max_size != previous_size
            || self.flags.contains(UsageFlag::CannotDiscoverSize) != previously_blind
    }

    fn observe_site(&mut self, site: UsageSite, path: String) -> bool {
        let mut changed = false;
        match find_site(&self.sites, &site, &path) {
            Some(index) => {
                // The stored identity is kept as first seen: objects sharing a
                // path or container fold into one site, and rewriting its ids
                // would make their repeats alternate forever.
                let record = &mut self.sites[index];
                if !path.is_empty() {
                    changed |= record.paths.insert(path.clone());
                }
            },
            None => {
                let mut paths = BTreeSet::new();
                if !path.is_empty() {
                    paths.insert(path.clone());
                }
                self.sites.push(SiteRecord { site, paths });
                changed = true;
            },
        }
        if !path.is_empty() {
            changed |= self.paths.insert(path);
        }
        changed
    }

    fn observe_scene(&mut self, scene: SceneId) -> bool {
        match scene {
            SceneId::Unresolved => self.flags.insert(UsageFlag::UsedInUnresolvedScene),
            scene => self.scenes.insert(scene),
        }
    }

    fn observe_size(&mut self, size: Option<ObservedSize>) {
        // Non-finite measurements are as good as no measurement.
        let size = size.filter(|s| s.x.is_finite() && s.y.is_finite() && s.z.is_finite());
        match size {
            None => {
                self.flags.insert(UsageFlag::CannotDiscoverSize);
            },
            Some(size) => {
                if self.max_size.is_none_or(|max| size.sqr_magnitude() > max.sqr_magnitude()) {
                    self.max_size = Some(size);
                }
            },
        }
    }
}
