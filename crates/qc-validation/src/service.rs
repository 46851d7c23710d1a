//! # Entity Processing Service
//!
//! Wires the validator and observer chains to the state cache.
//!
//! ## Block Flow
//!
//! ```text
//! create_delta
//!     │
//!     ├─ header, then each transaction in order:
//!     │     stateless validate ─→ stateful validate (current delta) ─→ observe (delta)
//!     │              └───────── first non-success: drop delta, report ──────┘
//!     │
//! commit ─→ CommitSummary
//! ```

use crate::adapters::{EntityNotificationPublisher, TransactionRegistry};
use crate::domain::{
    ConfigError, EntityPosition, ObserverError, ProcessingError, RegistryError, Severity,
    ValidationConfig, ValidationResult, WeakEntityInfo,
};
use crate::observers::{
    AccountAddressObserver, AccountPublicKeyObserver, AggregateNotificationObserver,
    BalanceReserveObserver, BalanceTransferObserver, EntityObserver, HashLockObserver,
    NotificationObserverAdapter, ObserverContext, SecretLockObserver,
};
use crate::plugins::{HashLockPlugin, SecretLockPlugin, TransferPlugin};
use crate::ports::NotificationPublisher;
use crate::validators::{
    stateful, stateless, BalanceReserveValidator, BalanceTransferValidator, DeadlineValidator,
    EntityTypeValidator, EntityVersionValidator, HashLockCacheUniqueValidator,
    HashLockDurationValidator, HashLockMosaicValidator, NetworkValidator,
    SecretLockCacheUniqueValidator, SecretLockDurationValidator, SecretLockHashAlgorithmValidator,
    SignatureValidator, TransferMessageValidator, TransferMosaicsValidator, ValidatorContext,
};
use qc_04_state_management::{AccountStateCache, CacheDelta, CommitSummary, StateCache};
use quantum_telemetry::{time_histogram, VALIDATION_DURATION};
use rayon::prelude::*;
use serde::Serialize;
use shared_types::{Block, Height, NetworkIdentifier, Timestamp, Transaction};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Registry with the transfer, hash lock and secret lock plugins.
pub fn default_registry() -> Result<TransactionRegistry, RegistryError> {
    let mut registry = TransactionRegistry::new();
    registry.register(Box::new(TransferPlugin))?;
    registry.register(Box::new(HashLockPlugin))?;
    registry.register(Box::new(SecretLockPlugin))?;
    Ok(registry)
}

/// The three entity-level stages applied to every entity.
pub struct ValidationPipeline {
    network: NetworkIdentifier,
    stateless: Arc<dyn stateless::EntityValidator>,
    stateful: Box<dyn stateful::EntityValidator>,
    observer: Box<dyn EntityObserver>,
}

impl ValidationPipeline {
    pub fn new(
        network: NetworkIdentifier,
        stateless: Arc<dyn stateless::EntityValidator>,
        stateful: Box<dyn stateful::EntityValidator>,
        observer: Box<dyn EntityObserver>,
    ) -> Self {
        Self {
            network,
            stateless,
            stateful,
            observer,
        }
    }

    /// Standard rule set for `config` over the plugins in `registry`.
    pub fn with_defaults(config: &ValidationConfig, registry: Arc<TransactionRegistry>) -> Self {
        let entity_types = EntityTypeValidator::from_registry(&registry);
        let publisher: Arc<dyn NotificationPublisher> =
            Arc::new(EntityNotificationPublisher::new(registry));

        let stateless = stateless::AggregateNotificationValidator::builder()
            .add(EntityVersionValidator::new(
                config.min_entity_version,
                config.max_entity_version,
            ))
            .add(entity_types)
            .add(SignatureValidator)
            .add(TransferMessageValidator::new(config.max_message_size))
            .add(TransferMosaicsValidator::new(config.max_mosaics_per_transfer))
            .add(HashLockDurationValidator::new(config.max_hash_lock_duration))
            .add(HashLockMosaicValidator::new(
                config.currency_mosaic_id,
                config.lock_funds_amount,
            ))
            .add(SecretLockDurationValidator::new(config.max_secret_lock_duration))
            .add(SecretLockHashAlgorithmValidator)
            .build();

        let stateful = stateful::AggregateNotificationValidator::builder()
            .add(NetworkValidator)
            .add(DeadlineValidator::new(config.max_transaction_lifetime))
            .add(BalanceTransferValidator)
            .add(BalanceReserveValidator)
            .add(HashLockCacheUniqueValidator)
            .add(SecretLockCacheUniqueValidator)
            .build();

        let observers = AggregateNotificationObserver::builder()
            .add(AccountAddressObserver)
            .add(AccountPublicKeyObserver)
            .add(BalanceTransferObserver)
            .add(BalanceReserveObserver)
            .add(HashLockObserver)
            .add(SecretLockObserver)
            .build();

        debug!(
            stateless = stateless.len(),
            stateful = stateful.len(),
            "[Pipeline] Default validators registered"
        );

        Self::new(
            config.network,
            Arc::new(stateless::NotificationValidatorAdapter::new(
                Box::new(stateless),
                publisher.clone(),
            )),
            Box::new(stateful::NotificationValidatorAdapter::new(
                Box::new(stateful),
                publisher.clone(),
            )),
            Box::new(NotificationObserverAdapter::new(Box::new(observers), publisher)),
        )
    }

    pub fn network(&self) -> NetworkIdentifier {
        self.network
    }

    pub fn stateless(&self) -> Arc<dyn stateless::EntityValidator> {
        self.stateless.clone()
    }
}

/// Stateless validation of independent entities in parallel.
pub struct BatchValidator {
    validator: Arc<dyn stateless::EntityValidator>,
}

impl BatchValidator {
    pub fn new(validator: Arc<dyn stateless::EntityValidator>) -> Self {
        Self { validator }
    }

    /// One result per entity, in input order.
    pub fn validate_all(&self, entities: &[WeakEntityInfo<'_>]) -> Vec<ValidationResult> {
        entities
            .par_iter()
            .map(|entity| self.validator.validate(entity))
            .collect()
    }

    pub fn validate_transactions(&self, transactions: &[Transaction]) -> Vec<ValidationResult> {
        transactions
            .par_iter()
            .map(|transaction| {
                self.validator
                    .validate(&WeakEntityInfo::from_transaction(transaction))
            })
            .collect()
    }
}

/// Result of processing one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ProcessingOutcome {
    /// Every entity passed; the delta was committed.
    Committed(CommitSummary),
    /// An entity failed permanently; the block must be discarded.
    Rejected {
        entity: EntityPosition,
        result: ValidationResult,
    },
    /// An entity cannot be decided yet; the block may be retried.
    Deferred {
        entity: EntityPosition,
        result: ValidationResult,
    },
}

impl ProcessingOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, ProcessingOutcome::Committed(_))
    }
}

/// Executes blocks against a shared [`StateCache`].
pub struct EntityProcessor {
    pipeline: ValidationPipeline,
    state: Arc<StateCache>,
}

impl EntityProcessor {
    /// Fails if the account cache derives addresses on another network than
    /// the pipeline validates for.
    pub fn new(pipeline: ValidationPipeline, state: Arc<StateCache>) -> Result<Self, ConfigError> {
        let cache_network = state
            .create_view()
            .try_sub::<AccountStateCache>()
            .map(|accounts| accounts.network_identifier());

        if let Some(cache) = cache_network.filter(|&cache| cache != pipeline.network) {
            error!(
                pipeline = %pipeline.network,
                cache = %cache,
                "[Processor] Network mismatch"
            );
            return Err(ConfigError::NetworkMismatch {
                pipeline: pipeline.network,
                cache,
            });
        }

        Ok(Self { pipeline, state })
    }

    pub fn state(&self) -> &Arc<StateCache> {
        &self.state
    }

    /// Validates one entity against committed state without executing it.
    pub fn check(
        &self,
        entity: &WeakEntityInfo<'_>,
        height: Height,
        block_time: Timestamp,
    ) -> ValidationResult {
        let result = self.pipeline.stateless.validate(entity);
        if !result.is_success() {
            return result;
        }

        let view = self.state.create_view();
        let context = ValidatorContext::new(height, block_time, self.pipeline.network, &view);
        self.pipeline.stateful.validate(entity, &context)
    }

    /// Validates and executes `block` atomically.
    ///
    /// State changes are committed only if every entity succeeds; otherwise
    /// the delta is dropped and the first non-success is reported.
    pub fn process_block(&self, block: &Block) -> Result<ProcessingOutcome, ProcessingError> {
        let height = block.header.height;
        let block_time = block.header.timestamp;
        let mut delta = self.state.create_delta()?;
        delta.set_height(height);

        let header = WeakEntityInfo::from_block(&block.header);
        let entities = std::iter::once((EntityPosition::BlockHeader, header)).chain(
            block
                .transactions
                .iter()
                .enumerate()
                .map(|(i, tx)| (EntityPosition::Transaction(i), WeakEntityInfo::from_transaction(tx))),
        );

        for (position, entity) in entities {
            let result = self
                .execute(&entity, &mut delta, height, block_time)
                .map_err(|source| ProcessingError::Observer {
                    entity: position,
                    source,
                })?;

            if result.is_success() {
                continue;
            }

            delta.rollback();
            return Ok(match result.severity() {
                Severity::Neutral => {
                    info!(height, entity = %position, result = %result, "[Processor] Block deferred");
                    ProcessingOutcome::Deferred {
                        entity: position,
                        result,
                    }
                }
                _ => {
                    warn!(height, entity = %position, result = %result, "[Processor] Block rejected");
                    ProcessingOutcome::Rejected {
                        entity: position,
                        result,
                    }
                }
            });
        }

        let summary = self.state.commit(delta)?;
        Ok(ProcessingOutcome::Committed(summary))
    }

    fn execute(
        &self,
        entity: &WeakEntityInfo<'_>,
        delta: &mut CacheDelta,
        height: Height,
        block_time: Timestamp,
    ) -> Result<ValidationResult, ObserverError> {
        let _timer = time_histogram!(VALIDATION_DURATION);
        let network = self.pipeline.network;

        let result = self.pipeline.stateless.validate(entity);
        if !result.is_success() {
            return Ok(result);
        }

        let result = {
            let context = ValidatorContext::new(height, block_time, network, &*delta);
            self.pipeline.stateful.validate(entity, &context)
        };
        if !result.is_success() {
            return Ok(result);
        }

        self.pipeline
            .observer
            .notify(entity, &mut ObserverContext::new(height, network, delta))?;
        Ok(ValidationResult::SUCCESS)
    }
}
