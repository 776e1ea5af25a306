use derive_more::Display;
use spritescope_catalog::AssetId;

/// Identifier of a packing group.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("{_0}")]
pub struct AtlasId(String);
impl AtlasId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for AtlasId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Enumerates the packing groups known to the project.
///
/// The enumeration order matters: it is the order
/// [`AtlasMembershipIndex::atlas_for_asset`](crate::AtlasMembershipIndex::atlas_for_asset)
/// scans in, and therefore decides which group wins for sprites packed more
/// than once. Implementations should return a stable order.
pub trait PackingSource {
    fn groups(&self) -> Vec<PackingGroup>;
}

/// A packing group as declared by the project, before variant resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PackingGroup {
    pub id: AtlasId,
    pub name: String,
    pub included_in_build: bool,
    pub kind: PackingKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PackingKind {
    /// Lists its packed sprites directly (folders already expanded).
    Master { members: Vec<AssetId> },
    /// Packs the same sprites as `master`, scaled by `scale`.
    Variant { master: AtlasId, scale: f32 },
}

impl PackingGroup {
    pub fn master(
        id: impl Into<AtlasId>,
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<AssetId>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            included_in_build: true,
            kind: PackingKind::Master {
                members: members.into_iter().map(Into::into).collect(),
            },
        }
    }

    pub fn variant(id: impl Into<AtlasId>, name: impl Into<String>, master: impl Into<AtlasId>, scale: f32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            included_in_build: true,
            kind: PackingKind::Variant {
                master: master.into(),
                scale,
            },
        }
    }

    pub fn excluded_from_build(mut self) -> Self {
        self.included_in_build = false;
        self
    }
}

/// A resolved packing group: variants carry their master's members.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasGroup {
    pub id: AtlasId,
    pub name: String,
    pub is_variant: bool,
    /// Uniform scale factor; always `1.0` for masters.
    pub scale: f32,
    pub included_in_build: bool,
    /// Packed sprites, in declaration order
    pub members: Vec<AssetId>,
}
