//! Usage site identity and deduplication policy.

use std::collections::BTreeSet;

/// The object consuming a sprite, as seen by the scanner.
///
/// `instance_id` is only stable within a play session; `container_id` (the
/// nearest enclosing prefab/container instance, if any) and the hierarchy path
/// carried alongside each observation let the same logical object be
/// recognised across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsageSite {
    pub instance_id: i64,
    pub container_id: Option<i64>,
}
impl UsageSite {
    pub fn new(instance_id: i64) -> Self {
        Self {
            instance_id,
            container_id: None,
        }
    }

    pub fn with_container(mut self, container_id: i64) -> Self {
        self.container_id = Some(container_id);
        self
    }
}

/// A stored site and every hierarchy path it has been observed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRecord {
    pub site: UsageSite,
    pub paths: BTreeSet<String>,
}

/// One of the equality tests deciding whether an observation comes from an
/// already-recorded site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteMatcher {
    /// Same runtime instance.
    InstanceId,
    /// The hierarchy path was already recorded for the site.
    KnownPath,
    /// Both live under the same container instance.
    SharedContainer,
}
impl SiteMatcher {
    pub fn matches(&self, record: &SiteRecord, site: &UsageSite, path: &str) -> bool {
        match self {
            SiteMatcher::InstanceId => record.site.instance_id == site.instance_id,
            SiteMatcher::KnownPath => !path.is_empty() && record.paths.contains(path),
            SiteMatcher::SharedContainer => {
                matches!((record.site.container_id, site.container_id), (Some(a), Some(b)) if a == b)
            },
        }
    }
}

/// Deduplication policy, in priority order.
///
/// Each matcher is tried against every stored site before moving on to the
/// next, and the first hit wins. Reordering this list changes which stored
/// site absorbs an observation when several would match.
pub const DEDUP_POLICY: [SiteMatcher; 3] = [SiteMatcher::InstanceId, SiteMatcher::KnownPath, SiteMatcher::SharedContainer];

/// Index of the stored site an observation belongs to, if any.
pub(crate) fn find_site(records: &[SiteRecord], site: &UsageSite, path: &str) -> Option<usize> {
    DEDUP_POLICY
        .iter()
        .find_map(|matcher| records.iter().position(|record| matcher.matches(record, site, path)))
}
