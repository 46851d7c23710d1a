//! # Delta-Tracked Set
//!
//! A committed base collection plus a working layer of tracked changes.
//!
//! ## Layers
//!
//! Every key in the working layer is tagged as exactly one of:
//!
//! | Tag | Meaning |
//! |-----|---------|
//! | `Added` | Not visible in base before this delta (or resurrected after a removal) |
//! | `Copied` | Present in base; the tagged value is a private, mutated copy |
//! | `Removed` | Present in base; hidden until commit deletes it |
//!
//! Reads resolve `Added` → `Copied` → base (unless `Removed`).
//!
//! ## Snapshots
//!
//! The base lives behind an `Arc`. Views and deltas share it, so views
//! opened before a commit keep observing pre-commit values.
//!
//! Commit writes in place when the base is the only owner of the map. If
//! any view is still alive it first clones the whole map, which costs time
//! and memory proportional to the committed state rather than to the
//! delta. Callers that hold views across commits (a long `check` running
//! beside block processing) pay that copy once per commit; short-lived
//! views dropped before commit pay nothing.
//!
//! Commit is the only way into the base. Rollback clears the working layer
//! in time proportional to the number of tracked changes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Tag carried by every key in the working layer.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DeltaEntry<V> {
    Added(V),
    Copied(V),
    /// Holds the base value being hidden.
    Removed(V),
}

/// Per-kind counts of a working layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
    pub copied: usize,
}

impl ChangeSummary {
    /// True if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.copied == 0
    }

    /// Sum of all tracked changes.
    pub fn total(&self) -> usize {
        self.added + self.removed + self.copied
    }
}

impl std::ops::Add for ChangeSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            added: self.added + rhs.added,
            removed: self.removed + rhs.removed,
            copied: self.copied + rhs.copied,
        }
    }
}

/// Read-only lookup shared by views and deltas.
pub trait ReadOnlySet<K, V>: Send + Sync {
    /// Resolves `key` to its visible value.
    fn find(&self, key: &K) -> Option<&V>;

    /// Number of visible elements.
    fn size(&self) -> usize;

    fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }
}

// =============================================================================
// BASE
// =============================================================================

/// Committed state.
#[derive(Debug)]
pub struct BaseSet<K, V> {
    elements: Arc<HashMap<K, V>>,
}

impl<K, V> Default for BaseSet<K, V> {
    fn default() -> Self {
        Self {
            elements: Arc::new(HashMap::new()),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for BaseSet<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            elements: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<K, V> BaseSet<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Immutable snapshot of the current base.
    pub fn view(&self) -> BaseSetView<K, V> {
        BaseSetView {
            elements: Arc::clone(&self.elements),
        }
    }

    /// Opens an empty working layer over the current base.
    pub fn rebase(&self) -> DeltaSet<K, V> {
        DeltaSet {
            base: Arc::clone(&self.elements),
            changes: HashMap::new(),
        }
    }

    /// Merges `delta` into the base: upserts `Added` and `Copied`, deletes
    /// `Removed`. Clones the base map first if a view still shares it.
    ///
    /// # Panics
    ///
    /// If `delta` was not opened from this base at its current version.
    pub fn commit(&mut self, delta: DeltaSet<K, V>) {
        let DeltaSet { base, changes } = delta;
        assert!(
            Arc::ptr_eq(&base, &self.elements),
            "delta committed to a base set it was not rebased from"
        );
        drop(base);

        if changes.is_empty() {
            return;
        }

        let elements = Arc::make_mut(&mut self.elements);
        for (key, entry) in changes {
            match entry {
                DeltaEntry::Added(value) | DeltaEntry::Copied(value) => {
                    elements.insert(key, value);
                }
                DeltaEntry::Removed(_) => {
                    elements.remove(&key);
                }
            }
        }
    }
}

/// Snapshot of a base at one version.
#[derive(Debug)]
pub struct BaseSetView<K, V> {
    elements: Arc<HashMap<K, V>>,
}

impl<K, V> Clone for BaseSetView<K, V> {
    fn clone(&self) -> Self {
        Self {
            elements: Arc::clone(&self.elements),
        }
    }
}

impl<K, V> BaseSetView<K, V>
where
    K: Eq + Hash,
{
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.elements.iter()
    }
}

impl<K, V> ReadOnlySet<K, V> for BaseSetView<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    fn find(&self, key: &K) -> Option<&V> {
        self.elements.get(key)
    }

    fn size(&self) -> usize {
        self.elements.len()
    }
}

// =============================================================================
// WORKING LAYER
// =============================================================================

/// Provisional changes over a base snapshot.
#[derive(Debug)]
pub struct DeltaSet<K, V> {
    base: Arc<HashMap<K, V>>,
    changes: HashMap<K, DeltaEntry<V>>,
}

impl<K, V> DeltaSet<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn find(&self, key: &K) -> Option<&V> {
        match self.changes.get(key) {
            Some(DeltaEntry::Added(value) | DeltaEntry::Copied(value)) => Some(value),
            Some(DeltaEntry::Removed(_)) => None,
            None => self.base.get(key),
        }
    }

    /// Mutable access; a base value is copied into the working layer first.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        if !self.changes.contains_key(key) {
            let original = self.base.get(key)?.clone();
            self.changes
                .insert(key.clone(), DeltaEntry::Copied(original));
        }

        match self.changes.get_mut(key) {
            Some(DeltaEntry::Added(value) | DeltaEntry::Copied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Inserts or overwrites `key`.
    ///
    /// A removed key is resurrected as `Added`; a base key becomes `Copied`.
    pub fn insert(&mut self, key: K, value: V) {
        let entry = match self.changes.get(&key) {
            Some(DeltaEntry::Removed(_) | DeltaEntry::Added(_)) => DeltaEntry::Added(value),
            Some(DeltaEntry::Copied(_)) => DeltaEntry::Copied(value),
            None if self.base.contains_key(&key) => DeltaEntry::Copied(value),
            None => DeltaEntry::Added(value),
        };
        self.changes.insert(key, entry);
    }

    /// Erases `key`, returning whether a visible element was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        let tracked = match self.changes.get(key) {
            Some(DeltaEntry::Removed(_)) => return false,
            Some(_) => true,
            None => false,
        };

        match self.base.get(key) {
            Some(original) => {
                let original = original.clone();
                self.changes
                    .insert(key.clone(), DeltaEntry::Removed(original));
                true
            }
            None => tracked && self.changes.remove(key).is_some(),
        }
    }

    /// Number of visible elements.
    pub fn len(&self) -> usize {
        let mut size = self.base.len();
        for (key, entry) in &self.changes {
            match entry {
                DeltaEntry::Added(_) if !self.base.contains_key(key) => size += 1,
                DeltaEntry::Removed(_) => size -= 1,
                _ => {}
            }
        }
        size
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Borrowed view of the working layer.
    pub fn deltas(&self) -> DeltaElements<'_, K, V> {
        DeltaElements {
            changes: &self.changes,
        }
    }

    /// Discards every tracked change.
    pub fn rollback(&mut self) {
        self.changes.clear();
    }
}

impl<K, V> ReadOnlySet<K, V> for DeltaSet<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn find(&self, key: &K) -> Option<&V> {
        DeltaSet::find(self, key)
    }

    fn size(&self) -> usize {
        self.len()
    }
}

/// Added, removed and copied elements of a working layer, by reference.
#[derive(Debug)]
pub struct DeltaElements<'a, K, V> {
    changes: &'a HashMap<K, DeltaEntry<V>>,
}

impl<K, V> Clone for DeltaElements<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for DeltaElements<'_, K, V> {}

impl<'a, K, V> DeltaElements<'a, K, V> {
    pub fn added(self) -> impl Iterator<Item = (&'a K, &'a V)> {
        self.changes.iter().filter_map(|(key, entry)| match entry {
            DeltaEntry::Added(value) => Some((key, value)),
            _ => None,
        })
    }

    /// Removed keys with the base values they hide.
    pub fn removed(self) -> impl Iterator<Item = (&'a K, &'a V)> {
        self.changes.iter().filter_map(|(key, entry)| match entry {
            DeltaEntry::Removed(value) => Some((key, value)),
            _ => None,
        })
    }

    pub fn copied(self) -> impl Iterator<Item = (&'a K, &'a V)> {
        self.changes.iter().filter_map(|(key, entry)| match entry {
            DeltaEntry::Copied(value) => Some((key, value)),
            _ => None,
        })
    }

    pub fn summary(self) -> ChangeSummary {
        self.changes
            .values()
            .fold(ChangeSummary::default(), |mut summary, entry| {
                match entry {
                    DeltaEntry::Added(_) => summary.added += 1,
                    DeltaEntry::Removed(_) => summary.removed += 1,
                    DeltaEntry::Copied(_) => summary.copied += 1,
                }
                summary
            })
    }
}
