//! # Lock Validators
//!
//! Hash locks and secret locks share the duration rule; stateful uniqueness
//! checks read the lock cache through the validator context.

use crate::domain::{
    kind, HashLockDurationNotification, HashLockMosaicNotification, HashLockNotification,
    SecretLockDurationNotification, SecretLockHashAlgorithmNotification, SecretLockNotification,
    ValidationResult,
};
use crate::validators::{stateful, stateless, ValidatorContext};
use qc_04_state_management::{secret_lock_key, ReadOnlyLockInfoCache};
use shared_types::{Amount, BlockDuration, LockHashAlgorithm, MosaicId};

fn check_duration(
    duration: BlockDuration,
    max_duration: BlockDuration,
    failure: ValidationResult,
) -> ValidationResult {
    if duration == 0 || duration > max_duration {
        failure
    } else {
        ValidationResult::SUCCESS
    }
}

pub struct HashLockDurationValidator {
    max_duration: BlockDuration,
}

impl HashLockDurationValidator {
    pub fn new(max_duration: BlockDuration) -> Self {
        Self { max_duration }
    }
}

impl stateless::TypedValidator for HashLockDurationValidator {
    type Notification = kind::HashLockDuration;

    fn name(&self) -> &'static str {
        "HashLockDurationValidator"
    }

    fn validate(&self, notification: &HashLockDurationNotification) -> ValidationResult {
        check_duration(
            notification.duration,
            self.max_duration,
            ValidationResult::FAILURE_LOCKHASH_INVALID_DURATION,
        )
    }
}

/// Collateral must be exactly `amount` of the currency mosaic.
pub struct HashLockMosaicValidator {
    mosaic_id: MosaicId,
    amount: Amount,
}

impl HashLockMosaicValidator {
    pub fn new(mosaic_id: MosaicId, amount: Amount) -> Self {
        Self { mosaic_id, amount }
    }
}

impl stateless::TypedValidator for HashLockMosaicValidator {
    type Notification = kind::HashLockMosaic;

    fn name(&self) -> &'static str {
        "HashLockMosaicValidator"
    }

    fn validate(&self, notification: &HashLockMosaicNotification) -> ValidationResult {
        if notification.mosaic.id != self.mosaic_id {
            ValidationResult::FAILURE_LOCKHASH_INVALID_MOSAIC_ID
        } else if notification.mosaic.amount != self.amount {
            ValidationResult::FAILURE_LOCKHASH_INVALID_MOSAIC_AMOUNT
        } else {
            ValidationResult::SUCCESS
        }
    }
}

pub struct HashLockCacheUniqueValidator;

impl stateful::TypedValidator for HashLockCacheUniqueValidator {
    type Notification = kind::HashLock;

    fn name(&self) -> &'static str {
        "HashLockCacheUniqueValidator"
    }

    fn validate(
        &self,
        notification: &HashLockNotification<'_>,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        let locks: ReadOnlyLockInfoCache<'_> = context.cache.sub();
        if locks.contains(notification.hash) {
            ValidationResult::FAILURE_LOCKHASH_HASH_ALREADY_EXISTS
        } else {
            ValidationResult::SUCCESS
        }
    }
}

pub struct SecretLockDurationValidator {
    max_duration: BlockDuration,
}

impl SecretLockDurationValidator {
    pub fn new(max_duration: BlockDuration) -> Self {
        Self { max_duration }
    }
}

impl stateless::TypedValidator for SecretLockDurationValidator {
    type Notification = kind::SecretLockDuration;

    fn name(&self) -> &'static str {
        "SecretLockDurationValidator"
    }

    fn validate(&self, notification: &SecretLockDurationNotification) -> ValidationResult {
        check_duration(
            notification.duration,
            self.max_duration,
            ValidationResult::FAILURE_LOCKSECRET_INVALID_DURATION,
        )
    }
}

pub struct SecretLockHashAlgorithmValidator;

impl stateless::TypedValidator for SecretLockHashAlgorithmValidator {
    type Notification = kind::SecretLockHashAlgorithm;

    fn name(&self) -> &'static str {
        "SecretLockHashAlgorithmValidator"
    }

    fn validate(&self, notification: &SecretLockHashAlgorithmNotification) -> ValidationResult {
        match LockHashAlgorithm::try_from(notification.hash_algorithm) {
            Ok(_) => ValidationResult::SUCCESS,
            Err(_) => ValidationResult::FAILURE_LOCKSECRET_INVALID_HASH_ALGORITHM,
        }
    }
}

/// A secret may be locked once per recipient.
pub struct SecretLockCacheUniqueValidator;

impl stateful::TypedValidator for SecretLockCacheUniqueValidator {
    type Notification = kind::SecretLock;

    fn name(&self) -> &'static str {
        "SecretLockCacheUniqueValidator"
    }

    fn validate(
        &self,
        notification: &SecretLockNotification<'_>,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        let locks: ReadOnlyLockInfoCache<'_> = context.cache.sub();
        if locks.contains(&secret_lock_key(notification.secret, notification.recipient)) {
            ValidationResult::FAILURE_LOCKSECRET_HASH_ALREADY_EXISTS
        } else {
            ValidationResult::SUCCESS
        }
    }
}
