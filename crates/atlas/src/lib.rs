//! Atlas packing-group membership.
//!
//! A packing group (atlas) is a named collection of sprites packed into one
//! texture. Groups come in two flavours:
//!
//! - **Masters** list their packed sprites directly.
//! - **Variants** reference a master and pack the same sprites at a uniform
//!   scale factor.
//!
//! [`AtlasMembershipIndex`] resolves both into a flat table of
//! [`AtlasGroup`]s. The table is static: it is built on demand and only
//! refreshed when explicitly invalidated, never on a timer.

mod index;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod models;

pub use crate::index::AtlasMembershipIndex;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockPacking;
pub use crate::models::{AtlasGroup, AtlasId, PackingGroup, PackingKind, PackingSource};
