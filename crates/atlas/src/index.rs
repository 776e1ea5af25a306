//! Static atlas membership table.

use std::collections::{BTreeSet, HashMap};

use spritescope_catalog::AssetId;
use tracing::instrument;

use crate::{AtlasGroup, AtlasId, PackingGroup, PackingKind, PackingSource};

/// Cached table of every packing group included in the build, with variants
/// resolved to their master's members.
///
/// The table starts stale and is only (re)built by [`rebuild`](Self::rebuild)
/// or [`ensure_built`](Self::ensure_built) after an
/// [`invalidate`](Self::invalidate). It is independent of the usage views:
/// refreshing membership does not dirty anything else.
#[derive(Debug)]
pub struct AtlasMembershipIndex {
    table: Vec<(AtlasGroup, BTreeSet<AssetId>)>,
    stale: bool,
}
impl Default for AtlasMembershipIndex {
    fn default() -> Self {
        Self::new()
    }
}
impl AtlasMembershipIndex {
    pub fn new() -> Self {
        Self { table: Vec::new(), stale: true }
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Mark the table stale. The current table stays readable until the next
    /// rebuild replaces it.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Rebuild only if the table was never built or has been invalidated.
    ///
    /// Returns `true` if a rebuild happened.
    pub fn ensure_built(&mut self, source: &dyn PackingSource) -> bool {
        if !self.stale {
            return false;
        }
        self.rebuild(source);
        true
    }

    /// Rebuild the whole table from `source`.
    ///
    /// Groups excluded from the build are skipped. Variants are resolved
    /// against *all* declared groups (a variant's master is usually excluded
    /// from the build itself); a variant whose master is missing, or is itself
    /// a variant, is skipped entirely rather than given partial membership.
    #[instrument(skip_all)]
    pub fn rebuild(&mut self, source: &dyn PackingSource) {
        let groups = source.groups();
        let declared: HashMap<&AtlasId, &PackingGroup> = groups.iter().map(|g| (&g.id, g)).collect();
        let mut table = Vec::with_capacity(groups.len());
        for group in &groups {
            if !group.included_in_build {
                tracing::trace!(atlas = %group.id, "Skipping group excluded from build");
                continue;
            }
            let (members, is_variant, scale) = match &group.kind {
                PackingKind::Master { members } => (members, false, 1.0),
                PackingKind::Variant { master, scale } => match declared.get(master).copied() {
                    Some(PackingGroup {
                        kind: PackingKind::Master { members },
                        ..
                    }) => (members, true, *scale),
                    _ => {
                        tracing::warn!(atlas = %group.id, master = %master, "Variant master could not be resolved; skipping group");
                        continue;
                    },
                },
            };
            let atlas = AtlasGroup {
                id: group.id.clone(),
                name: group.name.clone(),
                is_variant,
                scale,
                included_in_build: group.included_in_build,
                members: members.clone(),
            };
            table.push((atlas, members.iter().cloned().collect()));
        }
        tracing::debug!(declared = groups.len(), resolved = table.len(), "Atlas membership rebuilt");
        // Single assignment: readers see either the old table or the new one.
        self.table = table;
        self.stale = false;
    }

    /// The group `asset` is packed into.
    ///
    /// Linear scan in source enumeration order; the first group containing the
    /// asset wins, even if it is packed into several. See
    /// [`atlases_containing`](Self::atlases_containing) to detect that case.
    pub fn atlas_for_asset(&self, asset: &AssetId) -> Option<&AtlasGroup> {
        self.table.iter().find(|(_, members)| members.contains(asset)).map(|(group, _)| group)
    }

    /// Every group `asset` is packed into, in scan order.
    pub fn atlases_containing(&self, asset: &AssetId) -> Vec<&AtlasGroup> {
        self.table
            .iter()
            .filter(|(_, members)| members.contains(asset))
            .map(|(group, _)| group)
            .collect()
    }

    /// Members of the group `atlas`; empty for unknown (or skipped) groups.
    pub fn members_of(&self, atlas: &AtlasId) -> BTreeSet<AssetId> {
        self.table
            .iter()
            .find(|(group, _)| &group.id == atlas)
            .map(|(_, members)| members.clone())
            .unwrap_or_default()
    }

    pub fn group(&self, atlas: &AtlasId) -> Option<&AtlasGroup> {
        self.groups().find(|group| &group.id == atlas)
    }

    pub fn groups(&self) -> impl Iterator<Item = &AtlasGroup> {
        self.table.iter().map(|(group, _)| group)
    }
}
