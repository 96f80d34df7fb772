use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::util::BitSet;

/// interns the large arrays shared across trip-times vectors.
///
/// trips following the same pattern usually share identical hop times,
/// boarding rules and sequence arrays; interning them by value collapses tens
/// of thousands of copies to one shared allocation each. used only on the
/// single build thread, then dropped; the canonical `Arc`s it handed out live
/// on in the model.
#[derive(Default)]
pub struct Deduplicator {
    int_arrays: Pool<i32>,
    sequence_arrays: Pool<u32>,
    bit_sets: BitSetPool,
    string_arrays: Pool<Option<String>>,
    lists: HashMap<TypeId, Box<dyn Any>>,
    list_hits: usize,
    list_misses: usize,
}

struct Pool<T> {
    canonical: HashSet<Arc<[T]>>,
    hits: usize,
    misses: usize,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Pool {
            canonical: HashSet::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<T: Eq + Hash> Pool<T> {
    fn intern(&mut self, values: Vec<T>) -> Arc<[T]> {
        if let Some(existing) = self.canonical.get(values.as_slice()) {
            self.hits += 1;
            return existing.clone();
        }
        self.misses += 1;
        let canonical: Arc<[T]> = Arc::from(values);
        self.canonical.insert(canonical.clone());
        canonical
    }
}

#[derive(Default)]
struct BitSetPool {
    canonical: HashSet<Arc<BitSet>>,
    hits: usize,
    misses: usize,
}

impl BitSetPool {
    fn intern(&mut self, set: BitSet) -> Arc<BitSet> {
        if let Some(existing) = self.canonical.get(&set) {
            self.hits += 1;
            return existing.clone();
        }
        self.misses += 1;
        let canonical = Arc::new(set);
        self.canonical.insert(canonical.clone());
        canonical
    }
}

impl Deduplicator {
    pub fn new() -> Deduplicator {
        Deduplicator::default()
    }

    /// returns the canonical shared array equal to `values`.
    pub fn intern_int_array(&mut self, values: Vec<i32>) -> Arc<[i32]> {
        self.int_arrays.intern(values)
    }

    /// canonical array of feed-declared stop sequence numbers.
    pub fn intern_sequence_array(&mut self, values: Vec<u32>) -> Arc<[u32]> {
        self.sequence_arrays.intern(values)
    }

    pub fn intern_bit_set(&mut self, set: BitSet) -> Arc<BitSet> {
        self.bit_sets.intern(set)
    }

    pub fn intern_string_array(&mut self, values: Vec<Option<String>>) -> Arc<[Option<String>]> {
        self.string_arrays.intern(values)
    }

    /// interns an immutable list of any hashable element type, one canonical
    /// table per type.
    pub fn intern_list<T>(&mut self, values: Vec<T>) -> Arc<[T]>
    where
        T: Eq + Hash + Send + Sync + 'static,
    {
        let table = self
            .lists
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(HashSet::<Arc<[T]>>::new()));
        let table = table
            .downcast_mut::<HashSet<Arc<[T]>>>()
            .unwrap_or_else(|| unreachable!("list table registered under its own type id"));
        if let Some(existing) = table.get(values.as_slice()) {
            self.list_hits += 1;
            return existing.clone();
        }
        self.list_misses += 1;
        let canonical: Arc<[T]> = Arc::from(values);
        table.insert(canonical.clone());
        canonical
    }

    /// logs interning effectiveness at debug level, in the build report.
    pub fn log_stats(&self) {
        log::debug!("deduplicator: {self}");
    }
}

impl fmt::Display for Deduplicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "int arrays {}/{}, sequences {}/{}, bit sets {}/{}, string arrays {}/{}, lists {}/{} (hits/requests)",
            self.int_arrays.hits,
            self.int_arrays.hits + self.int_arrays.misses,
            self.sequence_arrays.hits,
            self.sequence_arrays.hits + self.sequence_arrays.misses,
            self.bit_sets.hits,
            self.bit_sets.hits + self.bit_sets.misses,
            self.string_arrays.hits,
            self.string_arrays.hits + self.string_arrays.misses,
            self.list_hits,
            self.list_hits + self.list_misses,
        )
    }
}
