use crate::domain::EntityPosition;
use qc_04_state_management::StateError;
use shared_types::{NetworkIdentifier, TypeError};
use thiserror::Error;

/// Errors raised while observers execute notifications into a delta.
///
/// Observers only run after validation succeeded, so any of these point at
/// a validator gap or corrupted state rather than a bad entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserverError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Type(#[from] TypeError),

    /// No account is registered under the key or its derived address.
    #[error("no account resolves for key {key}")]
    UnresolvableAccount { key: String },
}

/// Invalid validation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to parse {variable}: {reason}")]
    Environment { variable: &'static str, reason: String },

    #[error("failed to parse configuration: {0}")]
    Json(String),

    /// The pipeline and the account cache derive addresses on different
    /// networks.
    #[error("pipeline network {pipeline} does not match account cache network {cache}")]
    NetworkMismatch {
        pipeline: NetworkIdentifier,
        cache: NetworkIdentifier,
    },
}

/// Errors raised while wiring the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a plugin for {entity_type:?} is already registered")]
    DuplicatePlugin {
        entity_type: shared_types::EntityType,
    },
}

/// Errors surfaced by entity processing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    #[error(transparent)]
    State(#[from] StateError),

    /// An observer failed after the entity passed validation.
    #[error("observer failed for {entity}: {source}")]
    Observer {
        entity: EntityPosition,
        #[source]
        source: ObserverError,
    },
}
