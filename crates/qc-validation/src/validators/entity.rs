//! Rules every entity must satisfy regardless of its type.

use crate::adapters::TransactionRegistry;
use crate::domain::{
    kind, EntityNotification, SignatureNotification, TransactionNotification, ValidationResult,
};
use crate::validators::{stateful, stateless, ValidatorContext};
use shared_crypto::verify_signature;
use shared_types::EntityType;
use std::collections::BTreeSet;

/// Verifies the entity signature over the entity hash (ed25519).
pub struct SignatureValidator;

impl stateless::TypedValidator for SignatureValidator {
    type Notification = kind::CoreSignature;

    fn name(&self) -> &'static str {
        "SignatureValidator"
    }

    fn validate(&self, notification: &SignatureNotification<'_>) -> ValidationResult {
        if verify_signature(notification.signer, notification.data, notification.signature) {
            ValidationResult::SUCCESS
        } else {
            ValidationResult::FAILURE_CORE_SIGNATURE_NOT_VERIFIABLE
        }
    }
}

/// Accepts versions in `min..=max`.
pub struct EntityVersionValidator {
    min: u8,
    max: u8,
}

impl EntityVersionValidator {
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }
}

impl stateless::TypedValidator for EntityVersionValidator {
    type Notification = kind::CoreEntity;

    fn name(&self) -> &'static str {
        "EntityVersionValidator"
    }

    fn validate(&self, notification: &EntityNotification) -> ValidationResult {
        if (self.min..=self.max).contains(&notification.version) {
            ValidationResult::SUCCESS
        } else {
            ValidationResult::FAILURE_CORE_INVALID_VERSION
        }
    }
}

/// Rejects entity types nothing can decompose.
pub struct EntityTypeValidator {
    supported: BTreeSet<EntityType>,
}

impl EntityTypeValidator {
    pub fn new(supported: impl IntoIterator<Item = EntityType>) -> Self {
        Self {
            supported: supported.into_iter().collect(),
        }
    }

    /// Blocks plus every registered transaction type.
    pub fn from_registry(registry: &TransactionRegistry) -> Self {
        Self::new(std::iter::once(EntityType::Block).chain(registry.supported_types()))
    }
}

impl stateless::TypedValidator for EntityTypeValidator {
    type Notification = kind::CoreEntity;

    fn name(&self) -> &'static str {
        "EntityTypeValidator"
    }

    fn validate(&self, notification: &EntityNotification) -> ValidationResult {
        if self.supported.contains(&notification.entity_type) {
            ValidationResult::SUCCESS
        } else {
            ValidationResult::FAILURE_CORE_UNSUPPORTED_ENTITY_TYPE
        }
    }
}

pub struct NetworkValidator;

impl stateful::TypedValidator for NetworkValidator {
    type Notification = kind::CoreEntity;

    fn name(&self) -> &'static str {
        "NetworkValidator"
    }

    fn validate(
        &self,
        notification: &EntityNotification,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        if notification.network == context.network {
            ValidationResult::SUCCESS
        } else {
            ValidationResult::FAILURE_CORE_WRONG_NETWORK
        }
    }
}

/// Deadline must fall in `[block_time, block_time + max_lifetime]`.
pub struct DeadlineValidator {
    max_lifetime: u64,
}

impl DeadlineValidator {
    pub fn new(max_lifetime: u64) -> Self {
        Self { max_lifetime }
    }
}

impl stateful::TypedValidator for DeadlineValidator {
    type Notification = kind::CoreTransaction;

    fn name(&self) -> &'static str {
        "DeadlineValidator"
    }

    fn validate(
        &self,
        notification: &TransactionNotification<'_>,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        if notification.deadline < context.block_time {
            ValidationResult::FAILURE_CORE_PAST_DEADLINE
        } else if notification.deadline - context.block_time > self.max_lifetime {
            ValidationResult::FAILURE_CORE_FUTURE_DEADLINE
        } else {
            ValidationResult::SUCCESS
        }
    }
}
