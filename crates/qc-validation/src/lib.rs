//! # qc-validation
//!
//! Notification-driven validation and execution of ledger entities.
//!
//! ## Role in System
//!
//! - **Decomposition**: a publisher turns each transaction or block into an
//!   ordered sequence of typed notifications (`Notification`)
//! - **Validation**: stateless and stateful validator chains check each
//!   validator-channel notification and stop at the first non-success
//! - **Execution**: observers apply observer-channel notifications to the
//!   open state delta
//! - **Results**: every outcome is a packed `ValidationResult`
//!   (severity, facility, flags, code)
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): result codes, notifications, config
//! - **Ports Layer** (`ports/`): publisher, subscriber and plugin traits
//! - **Adapters Layer** (`adapters/`): entity publisher and plugin registry
//! - **Plugins** (`plugins/`): transfer, hash lock, secret lock
//! - **Validators / Observers**: rule chains per notification type
//! - **Service Layer** (`service.rs`): pipeline wiring and block processing
//!
//! ## Usage
//!
//! ```rust,ignore
//! let registry = Arc::new(default_registry()?);
//! let pipeline = ValidationPipeline::with_defaults(&ValidationConfig::from_env()?, registry);
//! let processor = EntityProcessor::new(pipeline, state)?;
//!
//! match processor.process_block(&block)? {
//!     ProcessingOutcome::Committed(summary) => { /* announce */ }
//!     ProcessingOutcome::Deferred { .. } => { /* requeue */ }
//!     ProcessingOutcome::Rejected { .. } => { /* discard */ }
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod observers;
pub mod plugins;
pub mod ports;
pub mod service;
pub mod validators;

#[cfg(test)]
pub(crate) mod test_utils;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::{
    default_registry, BatchValidator, EntityProcessor, ProcessingOutcome, ValidationPipeline,
};
pub use validators::ValidatorContext;
