use crate::domain::{
    BaseSet, BaseSetView, ChangeSummary, DeltaElements, DeltaSet, LockInfo, ReadOnlyCache,
    ReadOnlySet, StateError,
};
use crate::ports::{ReadOnlySubCache, SubCache};
use shared_types::Hash256;

/// Committed lock infos keyed by [`LockInfo::key`].
#[derive(Default)]
pub struct LockInfoCache {
    locks: BaseSet<Hash256, LockInfo>,
}

impl LockInfoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locks(locks: impl IntoIterator<Item = LockInfo>) -> Self {
        Self {
            locks: locks.into_iter().map(|lock| (lock.key(), lock)).collect(),
        }
    }
}

impl SubCache for LockInfoCache {
    type View = LockInfoCacheView;
    type Delta = LockInfoCacheDelta;
    const NAME: &'static str = "LockInfoCache";

    fn create_view(&self) -> Self::View {
        LockInfoCacheView {
            locks: self.locks.view(),
        }
    }

    fn create_delta(&self) -> Self::Delta {
        LockInfoCacheDelta {
            locks: self.locks.rebase(),
        }
    }

    fn change_summary(delta: &Self::Delta) -> ChangeSummary {
        delta.deltas().summary()
    }

    fn commit(&mut self, delta: Self::Delta) {
        self.locks.commit(delta.locks);
    }
}

pub struct LockInfoCacheView {
    locks: BaseSetView<Hash256, LockInfo>,
}

impl LockInfoCacheView {
    pub fn find(&self, key: &Hash256) -> Option<&LockInfo> {
        self.locks.find(key)
    }

    pub fn len(&self) -> usize {
        self.locks.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct LockInfoCacheDelta {
    locks: DeltaSet<Hash256, LockInfo>,
}

impl LockInfoCacheDelta {
    pub fn find(&self, key: &Hash256) -> Option<&LockInfo> {
        self.locks.find(key)
    }

    pub fn find_mut(&mut self, key: &Hash256) -> Option<&mut LockInfo> {
        self.locks.find_mut(key)
    }

    pub fn contains(&self, key: &Hash256) -> bool {
        self.locks.contains(key)
    }

    /// Adds a new lock; existing keys are never overwritten.
    pub fn insert(&mut self, lock: LockInfo) -> Result<(), StateError> {
        let key = lock.key();
        if self.locks.contains(&key) {
            return Err(StateError::LockAlreadyExists {
                key: hex::encode(key),
            });
        }
        self.locks.insert(key, lock);
        Ok(())
    }

    pub fn remove(&mut self, key: &Hash256) -> bool {
        self.locks.remove(key)
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    pub fn deltas(&self) -> DeltaElements<'_, Hash256, LockInfo> {
        self.locks.deltas()
    }
}

/// Read-only lock access for validators.
#[derive(Clone, Copy)]
pub struct ReadOnlyLockInfoCache<'a> {
    locks: &'a dyn ReadOnlySet<Hash256, LockInfo>,
}

impl<'a> ReadOnlyLockInfoCache<'a> {
    pub fn find(&self, key: &Hash256) -> Option<&'a LockInfo> {
        let locks = self.locks;
        locks.find(key)
    }

    pub fn contains(&self, key: &Hash256) -> bool {
        self.locks.contains(key)
    }
}

impl<'a> ReadOnlySubCache<'a> for ReadOnlyLockInfoCache<'a> {
    fn from_cache(cache: ReadOnlyCache<'a>) -> Self {
        match cache {
            ReadOnlyCache::Committed(view) => Self {
                locks: &view.sub::<LockInfoCache>().locks,
            },
            ReadOnlyCache::Current(delta) => Self {
                locks: &delta.sub::<LockInfoCache>().locks,
            },
        }
    }
}
