use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Values grouped by a categorical key.
///
/// Each group is append-only and keeps insertion order; duplicates are kept.
/// Groups iterate in ascending key order so reports are deterministic.
#[derive(Debug, Clone)]
pub struct EventStore<K: Ord, V> {
    groups: BTreeMap<K, Vec<V>>,
}

impl<K: Ord, V> Default for EventStore<K, V> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V> EventStore<K, V> {
    pub fn new() -> Self { Self::default() }

    /// Appends `value` to the group for `key`, creating the group if needed.
    pub fn add(&mut self, key: K, value: V) { self.groups.entry(key).or_default().push(value); }

    pub fn group<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&K, &[V])> + '_ {
        self.groups.iter().map(|(k, vs)| (k, vs.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ { self.groups.keys() }

    /// Number of groups.
    pub fn len(&self) -> usize { self.groups.len() }

    pub fn is_empty(&self) -> bool { self.groups.is_empty() }

    /// Number of values across all groups.
    pub fn total(&self) -> usize { self.groups.values().map(Vec::len).sum() }
}

impl<K: Ord, V> FromIterator<(K, V)> for EventStore<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (k, v) in iter {
            store.add(k, v);
        }
        store
    }
}
