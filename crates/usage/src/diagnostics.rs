//! Size-mismatch diagnostics and resize suggestions.
//!
//! A sprite is flagged when its largest observed on-screen size deviates from
//! its intrinsic rect by more than a relative threshold. Sizes are compared as
//! vectors, with the 2D rect extended by `z = 0`.

use spritescope_catalog::{Asset, ObservedSize, Size};
use tracing::debug;

use crate::error::{ErrorKind, Result};
use crate::flags::{FlagSet, UsageFlag};
use crate::summary::AssetUsageSummary;

/// Diagnostic flags for one asset: the recording facts from its summary plus
/// a size verdict, if the deviation exceeds `threshold`.
pub fn evaluate(summary: &AssetUsageSummary, asset: &Asset, threshold: f32) -> FlagSet {
    let mut flags: FlagSet = summary.flags().iter().filter(|flag| !flag.is_size_verdict()).collect();
    if let Some(verdict) = size_verdict(summary.max_size(), asset.rect, threshold) {
        flags.insert(verdict);
    }
    flags
}

fn size_verdict(max: Option<ObservedSize>, rect: Size, threshold: f32) -> Option<UsageFlag> {
    let max = max?;
    let intrinsic = ObservedSize::from(rect);
    let intrinsic_magnitude = rect.magnitude();
    if intrinsic_magnitude == 0.0 {
        return None;
    }
    let diff = (max - intrinsic).magnitude() / intrinsic_magnitude;
    if diff <= threshold {
        return None;
    }
    Some(if max.magnitude() > intrinsic_magnitude {
        UsageFlag::UsedBigger
    } else {
        UsageFlag::UsedSmaller
    })
}

/// A proposed new size for a sprite's source texture.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSuggestion {
    pub asset: Asset,
    pub current: Size,
    /// Largest observed size, rounded up to whole pixels.
    pub target: Size,
    /// Either [`UsageFlag::UsedBigger`] or [`UsageFlag::UsedSmaller`].
    pub direction: UsageFlag,
}

/// Work out how a sprite should be resized to match how it's actually used.
///
/// Only sprites that own their whole image can be resized on their own.
pub fn suggest_resize(summary: &AssetUsageSummary, asset: &Asset, threshold: f32) -> Result<ResizeSuggestion> {
    if !asset.is_resizable() {
        exn::bail!(ErrorKind::Ineligible(asset.id.to_string()));
    }
    let (Some(max), Some(direction)) = (summary.max_size(), size_verdict(summary.max_size(), asset.rect, threshold))
    else {
        exn::bail!(ErrorKind::NothingToFix(asset.id.to_string()));
    };
    let target = Size::new(max.x.ceil(), max.y.ceil());
    debug!(asset = %asset.id, %direction, width = target.width, height = target.height, "Suggesting resize");
    Ok(ResizeSuggestion {
        asset: asset.clone(),
        current: asset.rect,
        target,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::{UsageObservation, UsageRecorder};
    use crate::site::UsageSite;
    use rstest::rstest;
    use spritescope_catalog::{AssetId, ImportMode, SceneId};

    const THRESHOLD: f32 = 0.25;

    fn recorded(sizes: &[Option<(f32, f32)>]) -> UsageRecorder {
        let mut recorder = UsageRecorder::new();
        for size in sizes {
            let mut observation = UsageObservation::new("hero", SceneId::new("main"), UsageSite::new(1), "Canvas/Hero");
            if let Some((x, y)) = size {
                observation = observation.with_size(ObservedSize::flat(*x, *y));
            }
            recorder.record(observation);
        }
        recorder
    }

    fn hero(mode: ImportMode) -> Asset {
        Asset::new("hero", "hero", Size::new(100.0, 100.0), mode)
    }

    #[rstest]
    #[case((140.0, 140.0), Some(UsageFlag::UsedBigger))]
    #[case((90.0, 90.0), None)]
    #[case((120.0, 120.0), None)]
    #[case((50.0, 50.0), Some(UsageFlag::UsedSmaller))]
    fn test_size_verdict(#[case] size: (f32, f32), #[case] expected: Option<UsageFlag>) {
        let recorder = recorded(&[Some(size)]);
        let summary = recorder.summary(&AssetId::from("hero")).unwrap();
        let flags = evaluate(summary, &hero(ImportMode::Single), THRESHOLD);
        let verdicts: Vec<_> = flags.iter().filter(UsageFlag::is_size_verdict).collect();
        assert_eq!(verdicts, expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_never_measured_has_no_verdict() {
        let recorder = recorded(&[None]);
        let summary = recorder.summary(&AssetId::from("hero")).unwrap();
        let flags = evaluate(summary, &hero(ImportMode::Single), THRESHOLD);
        assert_eq!(flags, FlagSet::from([UsageFlag::CannotDiscoverSize]));
    }

    #[test]
    fn test_zero_sized_rect_has_no_verdict() {
        let recorder = recorded(&[Some((10.0, 10.0))]);
        let summary = recorder.summary(&AssetId::from("hero")).unwrap();
        let empty = Asset::new("hero", "hero", Size::new(0.0, 0.0), ImportMode::Single);
        assert!(evaluate(summary, &empty, THRESHOLD).is_empty());
    }

    #[test]
    fn test_suggest_resize_rounds_up() {
        let recorder = recorded(&[Some((140.2, 139.5))]);
        let summary = recorder.summary(&AssetId::from("hero")).unwrap();
        let suggestion = suggest_resize(summary, &hero(ImportMode::Single), THRESHOLD).unwrap();
        assert_eq!(suggestion.target, Size::new(141.0, 140.0));
        assert_eq!(suggestion.current, Size::new(100.0, 100.0));
        assert_eq!(suggestion.direction, UsageFlag::UsedBigger);
    }

    #[rstest]
    #[case(ImportMode::Multiple)]
    #[case(ImportMode::Polygon)]
    fn test_suggest_resize_refuses_sheets(#[case] mode: ImportMode) {
        let recorder = recorded(&[Some((140.0, 140.0))]);
        let summary = recorder.summary(&AssetId::from("hero")).unwrap();
        let err = suggest_resize(summary, &hero(mode), THRESHOLD).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Ineligible(id) if id == "hero"));
    }

    #[test]
    fn test_suggest_resize_nothing_to_fix() {
        let recorder = recorded(&[Some((100.0, 100.0))]);
        let summary = recorder.summary(&AssetId::from("hero")).unwrap();
        let err = suggest_resize(summary, &hero(ImportMode::Single), THRESHOLD).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NothingToFix(_)));
    }
}
