use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::error::{Error, ErrorKind};
use crate::{AssetId, Size};

/// How the owning image was sliced into sprites on import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportMode {
    /// One sprite covers the whole image.
    Single,
    /// The image is a sheet holding several sprites.
    Multiple,
    /// A single sprite with a custom polygon outline.
    Polygon,
}
impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Single => "Single",
            ImportMode::Multiple => "Multiple",
            ImportMode::Polygon => "Polygon",
        }
    }
}
impl FromStr for ImportMode {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "single" => Self::Single,
            "multiple" | "sheet" => Self::Multiple,
            "polygon" => Self::Polygon,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "import mode",
                value: s.to_string(),
            }),
        })
    }
}
impl Display for ImportMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A sprite as far as the usage index cares: an opaque identifier with a size
/// and the image resource it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    /// Intrinsic size of the sprite rect, in pixels
    pub rect: Size,
    pub import_mode: ImportMode,
    /// Path of the image resource that owns this sprite
    pub image: String,
}
impl Asset {
    pub fn new(id: impl Into<AssetId>, name: impl Into<String>, rect: Size, import_mode: ImportMode) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            image: name.clone(),
            name,
            rect,
            import_mode,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sheets can't be resized one sprite at a time, so only single-sprite
    /// images are candidates for resize remediation.
    pub fn is_resizable(&self) -> bool {
        self.import_mode == ImportMode::Single
    }
}
