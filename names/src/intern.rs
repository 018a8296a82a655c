use std::borrow::Borrow;
use std::hash::{BuildHasherDefault, Hash};
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHasher;

/// Concurrent map handing out shared copies of interned values.
///
/// Stack traces repeat frames and diagnostics repeat types, so renderings
/// are kept for the lifetime of the process.
pub struct InternMap<K, V: ?Sized> {
    map: DashMap<K, Arc<V>, BuildHasherDefault<FxHasher>>,
}

impl<K: Hash + Eq, V: ?Sized> InternMap<K, V> {
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(BuildHasherDefault::default()),
        }
    }

    pub fn add(&self, key: K, value: &V) -> Arc<V>
    where
        for<'a> &'a V: Into<Arc<V>>,
    {
        let value: Arc<V> = value.into();
        self.map.insert(key, Arc::clone(&value));
        value
    }

    pub fn get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_get() {
        let map: InternMap<String, str> = InternMap::new();
        assert!(map.get("key").is_none());

        let stored = map.add("key".to_owned(), "value");
        let fetched = map.get("key").unwrap();
        assert_eq!(&*fetched, "value");
        assert!(Arc::ptr_eq(&stored, &fetched));
        assert_eq!(map.len(), 1);
    }
}
