//! # Versioned State Cache
//!
//! Composite of sub-caches behind one read surface and one write handle.
//!
//! ## Handles
//!
//! - `CacheView`: immutable snapshot of every sub-cache at the last commit.
//!   Any number may be open; a view keeps its snapshot across later commits.
//! - `CacheDelta`: the single writable working layer. Opening a second one
//!   fails with `StateError::DeltaAlreadyOpen` until the first is committed
//!   or dropped.
//! - `ReadOnlyCache`: what validators see. It wraps either a committed view
//!   or the current (uncommitted) delta.
//!
//! ## Atomicity
//!
//! Views are collected under a shared lock and commits run under the
//! exclusive lock, so a view never mixes sub-caches from two versions.
//! `commit` consumes the delta; borrows of it (current views) end first.

use super::{ChangeSummary, StateError};
use crate::adapters::SubCachePluginAdapter;
use crate::ports::{DeltaSummarizer, ErasedState, ReadOnlySubCache, SubCache, SubCachePlugin};
use parking_lot::RwLock;
use quantum_telemetry::{
    metric_inc, metric_set, HistogramTimer, STATE_COMMITS, STATE_COMMIT_DURATION,
    STATE_DELTA_ELEMENTS, STATE_ROLLBACKS,
};
use serde::Serialize;
use shared_types::Height;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Per sub-cache change counts of one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub height: Height,
    pub sub_caches: Vec<(&'static str, ChangeSummary)>,
}

impl CommitSummary {
    pub fn total(&self) -> ChangeSummary {
        self.sub_caches
            .iter()
            .fold(ChangeSummary::default(), |total, (_, summary)| total + *summary)
    }
}

/// Builder for [`StateCache`]. Registration order is commit order.
#[derive(Default)]
pub struct StateCacheBuilder {
    sub_caches: Vec<Box<dyn SubCachePlugin>>,
}

impl StateCacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sub_cache<C: SubCache>(self, cache: C) -> Self {
        self.with_plugin(Box::new(SubCachePluginAdapter::new(cache)))
    }

    pub fn with_plugin(mut self, plugin: Box<dyn SubCachePlugin>) -> Self {
        self.sub_caches.push(plugin);
        self
    }

    pub fn build(self) -> Result<StateCache, StateError> {
        let mut index = HashMap::with_capacity(self.sub_caches.len());
        for (position, plugin) in self.sub_caches.iter().enumerate() {
            if index.insert(plugin.cache_type(), position).is_some() {
                return Err(StateError::DuplicateSubCache {
                    name: plugin.name(),
                });
            }
        }

        Ok(StateCache {
            sub_caches: self.sub_caches,
            index: Arc::new(index),
            state_lock: RwLock::new(()),
            writer: Arc::new(AtomicBool::new(false)),
            height: AtomicU64::new(0),
        })
    }
}

/// Shared ledger state: one writer, many readers.
pub struct StateCache {
    sub_caches: Vec<Box<dyn SubCachePlugin>>,
    index: Arc<HashMap<TypeId, usize>>,
    state_lock: RwLock<()>,
    writer: Arc<AtomicBool>,
    height: AtomicU64,
}

impl StateCache {
    pub fn builder() -> StateCacheBuilder {
        StateCacheBuilder::new()
    }

    /// Height of the last commit.
    pub fn height(&self) -> Height {
        self.height.load(Ordering::Acquire)
    }

    /// Snapshot of the committed state.
    pub fn create_view(&self) -> CacheView {
        let _guard = self.state_lock.read();
        CacheView {
            height: self.height(),
            views: self.sub_caches.iter().map(|c| c.create_view()).collect(),
            index: Arc::clone(&self.index),
        }
    }

    /// Opens the single writable delta.
    pub fn create_delta(&self) -> Result<CacheDelta, StateError> {
        if self
            .writer
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(StateError::DeltaAlreadyOpen);
        }

        let _guard = self.state_lock.read();
        let deltas = self
            .sub_caches
            .iter()
            .map(|cache| DeltaSlot {
                name: cache.name(),
                summarize: cache.summarizer(),
                state: cache.create_delta(),
            })
            .collect();

        debug!(height = self.height(), "[StateCache] Delta opened");
        Ok(CacheDelta {
            height: self.height(),
            deltas,
            index: Arc::clone(&self.index),
            lease: WriterLease {
                writer: Arc::clone(&self.writer),
                committed: false,
            },
        })
    }

    /// Merges `delta` into base state and releases the writer slot.
    pub fn commit(&self, delta: CacheDelta) -> Result<CommitSummary, StateError> {
        if !Arc::ptr_eq(&delta.lease.writer, &self.writer) {
            return Err(StateError::ForeignDelta);
        }

        let _timer = HistogramTimer::new(&STATE_COMMIT_DURATION);
        let CacheDelta {
            height,
            deltas,
            mut lease,
            ..
        } = delta;

        let mut sub_caches = Vec::with_capacity(deltas.len());
        {
            let _guard = self.state_lock.write();
            for (cache, slot) in self.sub_caches.iter().zip(deltas) {
                let summary = cache.commit(slot.state)?;
                sub_caches.push((cache.name(), summary));
            }
            self.height.store(height, Ordering::Release);
        }
        lease.committed = true;
        drop(lease);

        let summary = CommitSummary { height, sub_caches };
        let total = summary.total();
        metric_inc!(STATE_COMMITS);
        metric_set!(STATE_DELTA_ELEMENTS, &["added"], total.added as f64);
        metric_set!(STATE_DELTA_ELEMENTS, &["removed"], total.removed as f64);
        metric_set!(STATE_DELTA_ELEMENTS, &["copied"], total.copied as f64);

        info!(
            height,
            added = total.added,
            removed = total.removed,
            copied = total.copied,
            "[StateCache] Delta committed"
        );
        Ok(summary)
    }
}

/// Immutable snapshot of all sub-caches at one commit.
pub struct CacheView {
    height: Height,
    views: Vec<ErasedState>,
    index: Arc<HashMap<TypeId, usize>>,
}

impl CacheView {
    pub fn height(&self) -> Height {
        self.height
    }

    pub fn try_sub<C: SubCache>(&self) -> Option<&C::View> {
        let position = *self.index.get(&TypeId::of::<C>())?;
        self.views[position].downcast_ref::<C::View>()
    }

    /// # Panics
    ///
    /// If `C` was never registered with the cache.
    pub fn sub<C: SubCache>(&self) -> &C::View {
        self.try_sub::<C>()
            .unwrap_or_else(|| panic!("sub-cache {} is not registered", C::NAME))
    }
}

struct DeltaSlot {
    name: &'static str,
    summarize: DeltaSummarizer,
    state: ErasedState,
}

/// Releases the writer slot when the delta goes away.
struct WriterLease {
    writer: Arc<AtomicBool>,
    committed: bool,
}

impl Drop for WriterLease {
    fn drop(&mut self) {
        self.writer.store(false, Ordering::Release);
        if !self.committed {
            metric_inc!(STATE_ROLLBACKS);
            debug!("[StateCache] Delta discarded");
        }
    }
}

/// The single writable working layer over all sub-caches.
///
/// Dropping it without committing is a rollback.
pub struct CacheDelta {
    height: Height,
    deltas: Vec<DeltaSlot>,
    index: Arc<HashMap<TypeId, usize>>,
    lease: WriterLease,
}

impl CacheDelta {
    /// Height the delta will be committed at.
    pub fn height(&self) -> Height {
        self.height
    }

    pub fn set_height(&mut self, height: Height) {
        self.height = height;
    }

    pub fn try_sub<C: SubCache>(&self) -> Option<&C::Delta> {
        let position = *self.index.get(&TypeId::of::<C>())?;
        self.deltas[position].state.downcast_ref::<C::Delta>()
    }

    pub fn try_sub_mut<C: SubCache>(&mut self) -> Option<&mut C::Delta> {
        let position = *self.index.get(&TypeId::of::<C>())?;
        self.deltas[position].state.downcast_mut::<C::Delta>()
    }

    /// # Panics
    ///
    /// If `C` was never registered with the cache.
    pub fn sub<C: SubCache>(&self) -> &C::Delta {
        self.try_sub::<C>()
            .unwrap_or_else(|| panic!("sub-cache {} is not registered", C::NAME))
    }

    /// # Panics
    ///
    /// If `C` was never registered with the cache.
    pub fn sub_mut<C: SubCache>(&mut self) -> &mut C::Delta {
        self.try_sub_mut::<C>()
            .unwrap_or_else(|| panic!("sub-cache {} is not registered", C::NAME))
    }

    /// Change counts per sub-cache, in registration order.
    pub fn change_summaries(&self) -> Vec<(&'static str, ChangeSummary)> {
        self.deltas
            .iter()
            .map(|slot| {
                let summary = (slot.summarize)(&*slot.state).unwrap_or_default();
                (slot.name, summary)
            })
            .collect()
    }

    pub fn has_changes(&self) -> bool {
        self.change_summaries()
            .iter()
            .any(|(_, summary)| !summary.is_empty())
    }

    /// Explicit rollback; equivalent to dropping the delta.
    pub fn rollback(self) {}
}

/// Read-only access to either committed or current state.
#[derive(Clone, Copy)]
pub enum ReadOnlyCache<'a> {
    Committed(&'a CacheView),
    Current(&'a CacheDelta),
}

impl<'a> ReadOnlyCache<'a> {
    pub fn height(self) -> Height {
        match self {
            Self::Committed(view) => view.height(),
            Self::Current(delta) => delta.height(),
        }
    }

    /// Typed read-only facade for one sub-cache.
    pub fn sub<T: ReadOnlySubCache<'a>>(self) -> T {
        T::from_cache(self)
    }
}

impl<'a> From<&'a CacheView> for ReadOnlyCache<'a> {
    fn from(view: &'a CacheView) -> Self {
        Self::Committed(view)
    }
}

impl<'a> From<&'a CacheDelta> for ReadOnlyCache<'a> {
    fn from(delta: &'a CacheDelta) -> Self {
        Self::Current(delta)
    }
}
