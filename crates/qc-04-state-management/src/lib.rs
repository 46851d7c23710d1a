//! # qc-04-state-management
//!
//! State Management subsystem for Quantum-Chain.
//!
//! ## Role in System
//!
//! - **Single Source of Truth**: committed ledger state (accounts, locks)
//! - **Speculative Execution**: one copy-on-write delta per candidate block,
//!   committed atomically or dropped
//! - **Snapshot Reads**: validators read committed views or the current delta
//!   through `ReadOnlyCache`
//!
//! ## Layering
//!
//! ```text
//!                 ┌──────────────── StateCache ────────────────┐
//!  create_view ──→│  CacheView  (Arc snapshots, many)          │
//! create_delta ──→│  CacheDelta (working layer, exactly one)   │──commit──→ base
//!                 └───────┬───────────────────────┬────────────┘
//!                         │                       │
//!                AccountStateCache          LockInfoCache
//!                         │                       │
//!                 BaseSet / DeltaSet      BaseSet / DeltaSet
//! ```
//!
//! New partitions of state implement `SubCache` and register through
//! `StateCacheBuilder::with_sub_cache`.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
