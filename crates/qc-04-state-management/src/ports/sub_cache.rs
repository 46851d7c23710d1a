use crate::domain::{ChangeSummary, ReadOnlyCache, StateError};
use std::any::{Any, TypeId};

/// Boxed, type-erased sub-cache view or delta.
pub type ErasedState = Box<dyn Any + Send + Sync>;

/// Summarizes an erased delta; `None` if the type does not match.
pub type DeltaSummarizer = fn(&(dyn Any + Send + Sync)) -> Option<ChangeSummary>;

/// One partition of ledger state (accounts, locks, ...).
///
/// A sub-cache owns its committed base. Views are immutable snapshots of it;
/// a delta is a working layer that only `commit` merges back.
pub trait SubCache: Send + Sync + 'static {
    type View: Send + Sync + 'static;
    type Delta: Send + Sync + 'static;

    /// Name used in logs and commit summaries.
    const NAME: &'static str;

    fn create_view(&self) -> Self::View;

    fn create_delta(&self) -> Self::Delta;

    fn change_summary(delta: &Self::Delta) -> ChangeSummary;

    fn commit(&mut self, delta: Self::Delta);
}

/// Object-safe form of [`SubCache`] stored by the cache facade.
pub trait SubCachePlugin: Send + Sync {
    fn name(&self) -> &'static str;

    /// `TypeId` of the wrapped [`SubCache`].
    fn cache_type(&self) -> TypeId;

    fn create_view(&self) -> ErasedState;

    fn create_delta(&self) -> ErasedState;

    fn summarizer(&self) -> DeltaSummarizer;

    fn commit(&self, delta: ErasedState) -> Result<ChangeSummary, StateError>;
}

/// Typed read-only facade over one sub-cache, built from either a committed
/// view or the current delta.
pub trait ReadOnlySubCache<'a>: Sized {
    fn from_cache(cache: ReadOnlyCache<'a>) -> Self;
}
