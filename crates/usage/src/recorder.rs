//! Ingestion of raw usage observations.

use std::collections::BTreeMap;

use spritescope_catalog::{AssetId, ObservedSize, SceneId};

use crate::site::UsageSite;
use crate::summary::AssetUsageSummary;

/// One sprite seen in use by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageObservation {
    pub asset: AssetId,
    pub scene: SceneId,
    pub site: UsageSite,
    /// Hierarchy path of the consuming object within its scene
    pub path: String,
    /// Measured size, or `None` if the scanner couldn't tell
    pub size: Option<ObservedSize>,
}
impl UsageObservation {
    pub fn new(asset: impl Into<AssetId>, scene: SceneId, site: UsageSite, path: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            scene,
            site,
            path: path.into(),
            size: None,
        }
    }

    pub fn with_size(mut self, size: ObservedSize) -> Self {
        self.size = Some(size);
        self
    }
}

/// What recording an observation did to the raw data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// First observation of the asset.
    New,
    /// Known asset; a site, path, scene, size or flag changed.
    Updated,
    /// Exact repeat of what was already recorded.
    Unchanged,
}
impl Recorded {
    pub fn is_change(&self) -> bool {
        !matches!(self, Recorded::Unchanged)
    }
}

/// Raw usage data: one [`AssetUsageSummary`] per observed asset.
///
/// Observations are deduplicated per usage site (see
/// [`DEDUP_POLICY`](crate::site::DEDUP_POLICY)) and folded into a running
/// maximum size per asset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageRecorder {
    summaries: BTreeMap<AssetId, AssetUsageSummary>,
}

impl UsageRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_summaries(summaries: impl IntoIterator<Item = AssetUsageSummary>) -> Self {
        Self {
            summaries: summaries.into_iter().map(|s| (s.asset.clone(), s)).collect(),
        }
    }

    pub fn record(&mut self, observation: UsageObservation) -> Recorded {
        let UsageObservation {
            asset,
            scene,
            site,
            path,
            size,
        } = observation;
        let mut created = false;
        let summary = self.summaries.entry(asset.clone()).or_insert_with(|| {
            created = true;
            AssetUsageSummary::new(asset)
        });
        let changed = summary.observe(scene, site, path, size);
        match (created, changed) {
            (true, _) => Recorded::New,
            (false, true) => Recorded::Updated,
            (false, false) => Recorded::Unchanged,
        }
    }

    /// Start a new recording run.
    ///
    /// Sites, paths and scenes are kept. Each asset's size tracking (maximum
    /// and the "cannot discover" flag) starts over with its next observation,
    /// so a sprite that shrank since the last run isn't masked by a stale
    /// maximum.
    pub fn prepare_for_new_run(&mut self) {
        for summary in self.summaries.values_mut() {
            summary.awaiting_run = true;
        }
    }

    pub fn clear(&mut self) {
        self.summaries.clear();
    }

    pub fn summary(&self, asset: &AssetId) -> Option<&AssetUsageSummary> {
        self.summaries.get(asset)
    }

    pub fn summaries(&self) -> impl Iterator<Item = &AssetUsageSummary> {
        self.summaries.values()
    }

    pub fn is_used(&self, asset: &AssetId) -> bool {
        self.summaries.contains_key(asset)
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::UsageFlag;
    use rstest::rstest;

    fn seen(asset: &str, instance_id: i64, path: &str) -> UsageObservation {
        UsageObservation::new(asset, SceneId::new("main"), UsageSite::new(instance_id), path)
    }

    #[test]
    fn test_first_observation_creates_summary() {
        let mut recorder = UsageRecorder::new();
        assert_eq!(recorder.record(seen("hero", 1, "Canvas/Hero")), Recorded::New);
        let summary = recorder.summary(&"hero".into()).unwrap();
        assert_eq!(summary.site_count(), 1);
        assert!(summary.scenes().contains(&SceneId::new("main")));
    }

    #[test]
    fn test_exact_repeat_is_unchanged() {
        let mut recorder = UsageRecorder::new();
        let observation = seen("hero", 1, "Canvas/Hero").with_size(ObservedSize::flat(10.0, 10.0));
        recorder.record(observation.clone());
        assert_eq!(recorder.record(observation), Recorded::Unchanged);
        assert_eq!(recorder.summary(&"hero".into()).unwrap().site_count(), 1);
    }

    #[test]
    fn test_same_object_across_sessions() {
        let mut recorder = UsageRecorder::new();
        recorder.record(seen("hero", 1, "Canvas/Hero"));
        // New play session: instance id changed, path didn't.
        assert_eq!(recorder.record(seen("hero", 42, "Canvas/Hero")), Recorded::Unchanged);
        let summary = recorder.summary(&"hero".into()).unwrap();
        assert_eq!(summary.site_count(), 1);
        assert_eq!(summary.sites()[0].site.instance_id, 1);
        // The original instance id still matches after a rename.
        assert_eq!(recorder.record(seen("hero", 1, "Canvas/Player")), Recorded::Updated);
        let summary = recorder.summary(&"hero".into()).unwrap();
        assert_eq!(summary.site_count(), 1);
        assert_eq!(summary.paths().len(), 2);
    }

    #[rstest]
    #[case::shared_container(
        UsageSite::new(1).with_container(500),
        "Prefab/A",
        UsageSite::new(2).with_container(500),
        "Prefab/B"
    )]
    #[case::shared_path(UsageSite::new(1), "Canvas/Button", UsageSite::new(2), "Canvas/Button")]
    fn test_folded_sites_settle_across_frames(
        #[case] first: UsageSite,
        #[case] first_path: &str,
        #[case] second: UsageSite,
        #[case] second_path: &str,
    ) {
        let mut recorder = UsageRecorder::new();
        let frame = [
            UsageObservation::new("button", SceneId::new("main"), first, first_path),
            UsageObservation::new("button", SceneId::new("main"), second, second_path),
        ];
        for observation in frame.clone() {
            recorder.record(observation);
        }
        let settled = recorder.clone();
        for _ in 0..4 {
            for observation in frame.clone() {
                assert_eq!(recorder.record(observation), Recorded::Unchanged);
            }
        }
        assert_eq!(recorder, settled);
        let summary = recorder.summary(&"button".into()).unwrap();
        assert_eq!(summary.site_count(), 1);
        assert_eq!(summary.sites()[0].site, first);
    }

    #[test]
    fn test_several_sites_settle_across_frames() {
        let mut recorder = UsageRecorder::new();
        let frame = [
            seen("hero", 1, "Canvas/Hero").with_size(ObservedSize::flat(10.0, 10.0)),
            seen("hero", 2, "Canvas/Minimap/Hero").with_size(ObservedSize::flat(4.0, 4.0)),
            seen("coin", 3, "Canvas/Coin"),
            UsageObservation::new("coin", SceneId::Unresolved, UsageSite::new(4), "Overlay/Coin"),
        ];
        for observation in frame.clone() {
            assert!(recorder.record(observation).is_change());
        }
        for _ in 0..3 {
            for observation in frame.clone() {
                assert_eq!(recorder.record(observation), Recorded::Unchanged);
            }
        }
        assert_eq!(recorder.summary(&"hero".into()).unwrap().site_count(), 2);
        assert_eq!(recorder.summary(&"coin".into()).unwrap().site_count(), 2);
    }

    #[test]
    fn test_container_dedup() {
        let mut recorder = UsageRecorder::new();
        let site = UsageSite::new(1).with_container(500);
        recorder.record(UsageObservation::new("hero", SceneId::new("main"), site, "Prefab/A"));
        let site = UsageSite::new(2).with_container(500);
        recorder.record(UsageObservation::new("hero", SceneId::new("main"), site, "Prefab/B"));
        assert_eq!(recorder.summary(&"hero".into()).unwrap().site_count(), 1);
    }

    #[test]
    fn test_distinct_objects_are_distinct_sites() {
        let mut recorder = UsageRecorder::new();
        recorder.record(seen("hero", 1, "Canvas/A"));
        recorder.record(seen("hero", 2, "Canvas/B"));
        assert_eq!(recorder.summary(&"hero".into()).unwrap().site_count(), 2);
    }

    #[test]
    fn test_max_size_is_monotonic() {
        let mut recorder = UsageRecorder::new();
        let sizes = [(10.0, 10.0), (5.0, 5.0), (20.0, 5.0)];
        let mut previous = 0.0;
        for (x, y) in sizes {
            recorder.record(seen("hero", 1, "Canvas/Hero").with_size(ObservedSize::flat(x, y)));
            let max = recorder.summary(&"hero".into()).unwrap().max_size().unwrap();
            assert!(max.sqr_magnitude() >= previous);
            previous = max.sqr_magnitude();
        }
        let max = recorder.summary(&"hero".into()).unwrap().max_size();
        assert_eq!(max, Some(ObservedSize::flat(20.0, 5.0)));
    }

    #[test]
    fn test_smaller_size_is_unchanged() {
        let mut recorder = UsageRecorder::new();
        recorder.record(seen("hero", 1, "Canvas/Hero").with_size(ObservedSize::flat(10.0, 10.0)));
        let smaller = seen("hero", 1, "Canvas/Hero").with_size(ObservedSize::flat(5.0, 5.0));
        assert_eq!(recorder.record(smaller), Recorded::Unchanged);
    }

    #[test]
    fn test_unknown_size_is_sticky() {
        let mut recorder = UsageRecorder::new();
        assert_eq!(recorder.record(seen("hero", 1, "Canvas/Hero")), Recorded::New);
        let summary = recorder.summary(&"hero".into()).unwrap();
        assert!(summary.flags().contains(UsageFlag::CannotDiscoverSize));
        assert_eq!(summary.max_size(), None);
        recorder.record(seen("hero", 1, "Canvas/Hero").with_size(ObservedSize::flat(10.0, 10.0)));
        let summary = recorder.summary(&"hero".into()).unwrap();
        assert!(summary.flags().contains(UsageFlag::CannotDiscoverSize));
        assert_eq!(summary.max_size(), Some(ObservedSize::flat(10.0, 10.0)));
    }

    #[test]
    fn test_non_finite_size_counts_as_unknown() {
        let mut recorder = UsageRecorder::new();
        recorder.record(seen("hero", 1, "Canvas/Hero").with_size(ObservedSize::flat(f32::NAN, 1.0)));
        let summary = recorder.summary(&"hero".into()).unwrap();
        assert!(summary.flags().contains(UsageFlag::CannotDiscoverSize));
        assert_eq!(summary.max_size(), None);
    }

    #[test]
    fn test_unresolved_scene_sets_flag() {
        let mut recorder = UsageRecorder::new();
        recorder.record(UsageObservation::new("hero", SceneId::Unresolved, UsageSite::new(1), "Hero"));
        let summary = recorder.summary(&"hero".into()).unwrap();
        assert!(summary.scenes().is_empty());
        assert!(summary.flags().contains(UsageFlag::UsedInUnresolvedScene));
    }

    #[test]
    fn test_new_run_restarts_size_tracking() {
        let mut recorder = UsageRecorder::new();
        recorder.record(seen("hero", 1, "Canvas/Hero"));
        recorder.record(seen("hero", 1, "Canvas/Hero").with_size(ObservedSize::flat(100.0, 100.0)));
        recorder.prepare_for_new_run();
        // Nothing observed yet in the new run: history is untouched.
        let summary = recorder.summary(&"hero".into()).unwrap();
        assert_eq!(summary.max_size(), Some(ObservedSize::flat(100.0, 100.0)));
        assert!(summary.flags().contains(UsageFlag::CannotDiscoverSize));
        recorder.record(seen("hero", 1, "Canvas/Hero").with_size(ObservedSize::flat(50.0, 50.0)));
        let summary = recorder.summary(&"hero".into()).unwrap();
        assert_eq!(summary.max_size(), Some(ObservedSize::flat(50.0, 50.0)));
        assert!(!summary.flags().contains(UsageFlag::CannotDiscoverSize));
        assert_eq!(summary.site_count(), 1);
    }

    #[test]
    fn test_new_run_repeat_of_same_size_is_unchanged() {
        let mut recorder = UsageRecorder::new();
        let observation = seen("hero", 1, "Canvas/Hero").with_size(ObservedSize::flat(10.0, 10.0));
        recorder.record(observation.clone());
        recorder.prepare_for_new_run();
        assert_eq!(recorder.record(observation), Recorded::Unchanged);
    }
}
