use std::collections::BTreeSet;

use spritescope_catalog::{AssetId, ObservedSize, SceneId};

use crate::flags::{FlagSet, UsageFlag};
use crate::site::{SiteRecord, UsageSite};
use crate::summary::AssetUsageSummary;

#[derive(serde::Serialize, serde::Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct BlobProxy {
    #[serde(rename = "v")]
    pub(crate) version: u32,
    #[serde(rename = "a", default)]
    pub(crate) assets: Vec<SummaryProxy>,
}

#[derive(serde::Serialize, serde::Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct SummaryProxy {
    #[serde(rename = "id")]
    asset: String,
    #[serde(rename = "s", default)]
    sites: Vec<SiteProxy>,
    #[serde(rename = "sc", default)]
    scenes: Vec<String>,
    #[serde(rename = "dd", default, skip_serializing_if = "std::ops::Not::not")]
    unresolved_scene: bool,
    #[serde(rename = "nd", default, skip_serializing_if = "std::ops::Not::not")]
    cannot_discover_size: bool,
    #[serde(rename = "max", default, skip_serializing_if = "Option::is_none")]
    max_size: Option<[f32; 3]>,
}
impl From<&AssetUsageSummary> for SummaryProxy {
    fn from(summary: &AssetUsageSummary) -> Self {
        Self {
            asset: summary.asset.as_str().to_string(),
            sites: summary.sites.iter().map(SiteProxy::from).collect(),
            scenes: summary
                .scenes
                .iter()
                .filter_map(|scene| scene.as_str().map(str::to_string))
                .collect(),
            unresolved_scene: summary.flags.contains(UsageFlag::UsedInUnresolvedScene),
            cannot_discover_size: summary.flags.contains(UsageFlag::CannotDiscoverSize),
            max_size: summary.max_size.map(|size| [size.x, size.y, size.z]),
        }
    }
}
impl From<SummaryProxy> for AssetUsageSummary {
    fn from(proxy: SummaryProxy) -> Self {
        let sites: Vec<SiteRecord> = proxy.sites.into_iter().map(SiteRecord::from).collect();
        let paths = sites.iter().flat_map(|record| record.paths.iter().cloned()).collect();
        let mut flags = FlagSet::new();
        if proxy.unresolved_scene {
            flags.insert(UsageFlag::UsedInUnresolvedScene);
        }
        if proxy.cannot_discover_size {
            flags.insert(UsageFlag::CannotDiscoverSize);
        }
        Self {
            asset: AssetId::new(proxy.asset),
            sites,
            paths,
            scenes: proxy.scenes.into_iter().map(SceneId::new).collect(),
            max_size: proxy.max_size.map(|[x, y, z]| ObservedSize::new(x, y, z)),
            flags,
            awaiting_run: false,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct SiteProxy {
    #[serde(rename = "i")]
    instance_id: i64,
    #[serde(rename = "c", default, skip_serializing_if = "Option::is_none")]
    container_id: Option<i64>,
    #[serde(rename = "p", default)]
    paths: Vec<String>,
}
impl From<&SiteRecord> for SiteProxy {
    fn from(record: &SiteRecord) -> Self {
        Self {
            instance_id: record.site.instance_id,
            container_id: record.site.container_id,
            paths: record.paths.iter().cloned().collect(),
        }
    }
}
impl From<SiteProxy> for SiteRecord {
    fn from(proxy: SiteProxy) -> Self {
        Self {
            site: UsageSite {
                instance_id: proxy.instance_id,
                container_id: proxy.container_id,
            },
            paths: proxy.paths.into_iter().filter(|path| !path.is_empty()).collect::<BTreeSet<_>>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_field_names() {
        let proxy = SiteProxy {
            instance_id: 7,
            container_id: None,
            paths: vec!["Canvas/Hero".to_string()],
        };
        let json = serde_json::to_string(&proxy).unwrap();
        assert_eq!(json, r#"{"i":7,"p":["Canvas/Hero"]}"#);
    }

    #[test]
    fn test_missing_optional_fields() {
        let proxy: SummaryProxy = serde_json::from_str(r#"{"id":"hero"}"#).unwrap();
        let summary = AssetUsageSummary::from(proxy);
        assert_eq!(summary.asset(), &AssetId::from("hero"));
        assert!(summary.sites().is_empty());
        assert!(summary.flags().is_empty());
        assert_eq!(summary.max_size(), None);
    }
}
