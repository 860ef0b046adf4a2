//! Where the table snapshot is persisted between page visits.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::protocol::TABLE_STATE_URL_PARAM;
use url::Url;

pub trait UrlStateStore: Send + Sync {
    fn read(&self) -> Option<String>;
    fn write(&self, value: &str);
}

pub struct DetachedUrlStore;

impl UrlStateStore for DetachedUrlStore {
    fn read(&self) -> Option<String> {
        None
    }

    fn write(&self, _value: &str) {}
}

#[derive(Clone, Default)]
pub struct MemoryUrlStore {
    inner: Arc<Mutex<MemoryUrlState>>,
}

#[derive(Default)]
struct MemoryUrlState {
    value: Option<String>,
    writes: usize,
}

impl MemoryUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        let store = Self::default();
        store.lock().value = Some(value.into());
        store
    }

    pub fn value(&self) -> Option<String> {
        self.lock().value.clone()
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, MemoryUrlState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UrlStateStore for MemoryUrlStore {
    fn read(&self) -> Option<String> {
        self.value()
    }

    fn write(&self, value: &str) {
        let mut guard = self.lock();
        guard.value = Some(value.to_string());
        guard.writes += 1;
    }
}

/// Keeps the snapshot in one query parameter of a page URL, leaving the
/// other parameters and their order alone.
#[derive(Clone)]
pub struct QueryStringUrlStore {
    url: Arc<Mutex<Url>>,
    param: String,
}

impl QueryStringUrlStore {
    pub fn new(url: Url) -> Self {
        Self::with_param(url, TABLE_STATE_URL_PARAM)
    }

    pub fn with_param(url: Url, param: impl Into<String>) -> Self {
        Self {
            url: Arc::new(Mutex::new(url)),
            param: param.into(),
        }
    }

    pub fn current_url(&self) -> Url {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Url> {
        self.url.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UrlStateStore for QueryStringUrlStore {
    fn read(&self) -> Option<String> {
        self.lock()
            .query_pairs()
            .find(|(key, _)| key == self.param.as_str())
            .map(|(_, value)| value.into_owned())
    }

    fn write(&self, value: &str) {
        let mut url = self.lock();
        let mut replaced = false;
        let mut pairs = Vec::new();
        for (key, existing) in url.query_pairs() {
            if key == self.param.as_str() {
                if !replaced {
                    pairs.push((key.into_owned(), value.to_string()));
                    replaced = true;
                }
            } else {
                pairs.push((key.into_owned(), existing.into_owned()));
            }
        }
        if !replaced {
            pairs.push((self.param.clone(), value.to_string()));
        }

        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_counts_writes() {
        let store = MemoryUrlStore::with_value("seed");
        assert_eq!(store.read().as_deref(), Some("seed"));
        store.write("next");
        assert_eq!(store.value().as_deref(), Some("next"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn query_store_replaces_only_its_parameter() {
        let url = Url::parse("https://example.test/users?tab=all&tableRendererState=old&x=1")
            .expect("url");
        let store = QueryStringUrlStore::new(url);
        assert_eq!(store.read().as_deref(), Some("old"));

        store.write(r#"{"page":2,"filters":[]}"#);
        assert_eq!(store.read().as_deref(), Some(r#"{"page":2,"filters":[]}"#));

        let current = store.current_url();
        let keys: Vec<String> = current
            .query_pairs()
            .map(|(key, _)| key.into_owned())
            .collect();
        assert_eq!(keys, vec!["tab", "tableRendererState", "x"]);
        assert_eq!(current.path(), "/users");
        assert!(!current.as_str().contains('{'));
    }

    #[test]
    fn query_store_appends_when_missing() {
        let store = QueryStringUrlStore::new(Url::parse("https://example.test/").expect("url"));
        assert_eq!(store.read(), None);
        store.write("v");
        assert_eq!(
            store.current_url().as_str(),
            "https://example.test/?tableRendererState=v"
        );
    }

    #[test]
    fn detached_store_is_inert() {
        DetachedUrlStore.write("anything");
        assert_eq!(DetachedUrlStore.read(), None);
    }
}
