use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Parameter sets of one kind (SPS, PPS, ...) keyed by their id.
///
/// The store is append-only for the lifetime of a stream: the first value
/// inserted for an id is kept and later repetitions of that id are ignored.
#[derive(Debug, Clone)]
pub struct ParameterSetStore<T> {
    entries: BTreeMap<u32, T>,
}

impl<T> Default for ParameterSetStore<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> ParameterSetStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `id`. Returns false, leaving the store untouched,
    /// if the id is already present.
    pub fn insert(&mut self, id: u32, value: T) -> bool {
        match self.entries.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
            Entry::Occupied(_) => {
                log::debug!("parameter set {} already stored, keeping the first one", id);
                false
            }
        }
    }

    /// Looks up a parameter set.
    pub fn get(&self, id: u32) -> Option<&T> {
        self.entries.get(&id)
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    /// Stored ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// Number of stored parameter sets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
