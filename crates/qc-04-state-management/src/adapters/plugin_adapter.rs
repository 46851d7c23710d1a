use crate::domain::{ChangeSummary, StateError};
use crate::ports::{DeltaSummarizer, ErasedState, SubCache, SubCachePlugin};
use parking_lot::RwLock;
use std::any::TypeId;

/// Adapts a typed [`SubCache`] to the object-safe [`SubCachePlugin`].
pub struct SubCachePluginAdapter<C: SubCache> {
    cache: RwLock<C>,
}

impl<C: SubCache> SubCachePluginAdapter<C> {
    pub fn new(cache: C) -> Self {
        Self {
            cache: RwLock::new(cache),
        }
    }
}

impl<C: SubCache> SubCachePlugin for SubCachePluginAdapter<C> {
    fn name(&self) -> &'static str {
        C::NAME
    }

    fn cache_type(&self) -> TypeId {
        TypeId::of::<C>()
    }

    fn create_view(&self) -> ErasedState {
        Box::new(self.cache.read().create_view())
    }

    fn create_delta(&self) -> ErasedState {
        Box::new(self.cache.read().create_delta())
    }

    fn summarizer(&self) -> DeltaSummarizer {
        |delta| delta.downcast_ref::<C::Delta>().map(C::change_summary)
    }

    fn commit(&self, delta: ErasedState) -> Result<ChangeSummary, StateError> {
        let delta = delta
            .downcast::<C::Delta>()
            .map_err(|_| StateError::SubCacheTypeMismatch { name: C::NAME })?;

        let summary = C::change_summary(&delta);
        self.cache.write().commit(*delta);
        Ok(summary)
    }
}
