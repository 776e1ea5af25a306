//! Asset and scene catalog.
//!
//! Everything the usage index knows about sprites and scenes comes through
//! here: opaque identifiers ([`AssetId`], [`SceneId`]), the records they map
//! to ([`Asset`], [`Scene`]), and an [`AssetResolver`] that caches the
//! (potentially expensive) lookups against an authoritative [`AssetSource`].
//!
//! Assets are treated as opaque: an identifier, a name, an intrinsic rect size,
//! an import mode and the image resource that owns them. Nothing in this crate
//! parses asset files.

pub mod error;
mod id;
#[cfg(any(test, feature = "mock"))]
mod mock;
pub mod models;
mod resolver;

pub use crate::id::{AssetId, SceneId};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockSource;
pub use crate::models::{Asset, ImportMode, ObservedSize, Scene, Size};
pub use crate::resolver::{AssetResolver, AssetSource};
