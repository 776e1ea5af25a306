use derive_more::Display;

/// Opaque, stable identifier of a sprite asset (typically a GUID).
///
/// Identifiers survive renames and moves of the underlying asset, which is
/// what makes them usable as persistent keys for recorded usage.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("{_0}")]
pub struct AssetId(String);
impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of the scene an asset was observed in.
///
/// [`Unresolved`](Self::Unresolved) stands for "no persistent scene": objects
/// living in transient or don't-destroy contexts that can't be attributed to
/// a scene on disk. It never resolves to a [`Scene`](crate::Scene).
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SceneId {
    #[display("(unresolved)")]
    Unresolved,
    #[display("{_0}")]
    Persistent(String),
}
impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self::Persistent(id.into())
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// The underlying identifier, or `None` for the unresolved sentinel.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Unresolved => None,
            Self::Persistent(id) => Some(id),
        }
    }
}
impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
