use tracing::info;

/// Host key/value settings storage the usage blob is persisted into.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

impl<S: SettingsStore + ?Sized> SettingsStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        (**self).set(key, value)
    }
}

/// In-memory settings store.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: std::collections::HashMap<String, String>,
    writes: usize,
}
#[cfg(any(test, feature = "mock"))]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls made so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}
#[cfg(any(test, feature = "mock"))]
impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.writes += 1;
        self.values.insert(key.to_string(), value);
    }
}

/// Read-only settings store.
///
/// Wraps another store for dry runs: reads pass through, writes are dropped
/// with an [`info event`](tracing::Event).
#[derive(Debug, Clone, Default)]
pub struct ReadOnlyStore<S> {
    inner: S,
}
impl<S: SettingsStore> ReadOnlyStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}
impl<S: SettingsStore> SettingsStore for ReadOnlyStore<S> {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: String) {
        info!(key, bytes = value.len(), "Skipping write during read-only mode");
    }
}
