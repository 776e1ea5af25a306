//! Persistence of raw usage observations.
//!
//! Only the recorded observations are stored, as one compact JSON blob under a
//! single settings key. Derived views and resolver caches are rebuilt after
//! loading and never hit storage.

mod proxy;
mod store;

use exn::ResultExt;
use tracing::{debug, warn};

use self::proxy::{BlobProxy, SummaryProxy};
#[cfg(any(test, feature = "mock"))]
pub use self::store::MemoryStore;
pub use self::store::{ReadOnlyStore, SettingsStore};
use crate::error::{ErrorKind, Result};
use crate::recorder::UsageRecorder;

/// Format version written into every blob.
pub const BLOB_VERSION: u32 = 1;

pub fn encode(recorder: &UsageRecorder) -> Result<String> {
    let blob = BlobProxy {
        version: BLOB_VERSION,
        assets: recorder.summaries().map(SummaryProxy::from).collect(),
    };
    serde_json::to_string(&blob).or_raise(|| ErrorKind::InvalidData("usage blob"))
}

/// Read a blob back into a recorder.
///
/// Missing, empty, malformed or unknown-version blobs all read as "nothing
/// recorded yet": usage data is an audit aid and is always safe to rebuild.
pub fn decode(blob: Option<&str>) -> UsageRecorder {
    let Some(blob) = blob.filter(|blob| !blob.trim().is_empty()) else {
        warn!("No usage data found, starting empty");
        return UsageRecorder::new();
    };
    let proxy: BlobProxy = match serde_json::from_str(blob) {
        Ok(proxy) => proxy,
        Err(error) => {
            warn!(%error, "Discarding malformed usage data");
            return UsageRecorder::new();
        },
    };
    if proxy.version != BLOB_VERSION {
        warn!(version = proxy.version, expected = BLOB_VERSION, "Discarding usage data of unknown version");
        return UsageRecorder::new();
    }
    debug!(assets = proxy.assets.len(), "Decoded usage data");
    UsageRecorder::from_summaries(proxy.assets.into_iter().map(Into::into))
}
