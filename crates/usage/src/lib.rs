//! Sprite usage recording and audit.
//!
//! A scanner reports every sprite it sees in use as a [`UsageObservation`]:
//! which asset, in which scene, on which object, at what on-screen size. The
//! [`UsageDatabase`] folds those into one [`AssetUsageSummary`] per asset and,
//! on demand, derives cross-reference [`UsageViews`]:
//!
//! - scene → atlas → assets, plus the scene's atlas-less assets,
//! - asset → scenes and asset → hierarchy paths,
//! - a separate bucket for sprites seen outside any scene on disk.
//!
//! [`diagnostics`] compares the largest observed size against each sprite's
//! intrinsic rect and flags (or proposes resizing) sprites that are used much
//! bigger or smaller than they are. Raw observations round-trip through a
//! host [`SettingsStore`] via [`persist`].

mod aggregator;
mod database;
pub mod diagnostics;
pub mod error;
mod flags;
pub mod persist;
mod recorder;
mod site;
mod summary;

pub use crate::aggregator::{SceneBucket, UsageAggregator, UsageViews};
pub use crate::database::UsageDatabase;
pub use crate::diagnostics::ResizeSuggestion;
pub use crate::flags::{FlagSet, UsageFlag};
#[cfg(any(test, feature = "mock"))]
pub use crate::persist::MemoryStore;
pub use crate::persist::{ReadOnlyStore, SettingsStore};
pub use crate::recorder::{Recorded, UsageObservation, UsageRecorder};
pub use crate::site::{DEDUP_POLICY, SiteMatcher, SiteRecord, UsageSite};
pub use crate::summary::AssetUsageSummary;
