//! # Validators
//!
//! `stateless` and `stateful` mirror each other: a notification validator
//! trait, a typed form bound to one [`NotificationKind`], an aggregate that
//! dispatches by notification type and an adapter that validates a whole
//! entity. They differ only in the context passed to each validator; the
//! dispatch and short-circuit rules live here and are shared by both.
//!
//! The concrete rule sets live in `entity`, `balance`, `transfer` and `lock`.
//!
//! [`NotificationKind`]: crate::domain::NotificationKind

pub mod balance;
pub mod entity;
pub mod lock;
pub mod stateful;
pub mod stateless;
pub mod transfer;

pub use balance::{BalanceReserveValidator, BalanceTransferValidator};
pub use entity::{
    DeadlineValidator, EntityTypeValidator, EntityVersionValidator, NetworkValidator,
    SignatureValidator,
};
pub use lock::{
    HashLockCacheUniqueValidator, HashLockDurationValidator, HashLockMosaicValidator,
    SecretLockCacheUniqueValidator, SecretLockDurationValidator, SecretLockHashAlgorithmValidator,
};
pub use stateful::ValidatorContext;
pub use transfer::{TransferMessageValidator, TransferMosaicsValidator};

use crate::domain::{Notification, NotificationType, ValidationResult, WeakEntityInfo};
use crate::ports::NotificationPublisher;
use quantum_telemetry::{log_at_level, metric_inc, VALIDATION_RESULTS};
use std::collections::HashMap;
use std::fmt::Display;
use std::ops::ControlFlow;

/// Positions of registered handlers per notification type.
#[derive(Default)]
pub(crate) struct DispatchIndex {
    by_type: HashMap<NotificationType, Vec<usize>>,
}

impl DispatchIndex {
    /// Splits `(type, handler)` pairs into the handler list and its index,
    /// preserving registration order.
    pub(crate) fn build<T>(entries: Vec<(NotificationType, T)>) -> (Self, Vec<T>) {
        let mut index = Self::default();
        let handlers = entries
            .into_iter()
            .enumerate()
            .map(|(i, (notification_type, handler))| {
                index.by_type.entry(notification_type).or_default().push(i);
                handler
            })
            .collect();
        (index, handlers)
    }

    pub(crate) fn lookup(&self, notification_type: NotificationType) -> &[usize] {
        self.by_type
            .get(&notification_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// First non-success of a lazily evaluated sequence; later results are never
/// computed. Neutral stops the walk like a failure does.
pub(crate) fn first_non_success<I>(results: I) -> ValidationResult
where
    I: IntoIterator<Item = ValidationResult>,
{
    results
        .into_iter()
        .find(|result| !result.is_success())
        .unwrap_or(ValidationResult::SUCCESS)
}

/// Publishes `entity` and validates its validator-channel notifications in
/// order, stopping publication at the first non-success.
pub(crate) fn validate_published<F>(
    publisher: &dyn NotificationPublisher,
    entity: &WeakEntityInfo<'_>,
    mut validate: F,
) -> ValidationResult
where
    F: FnMut(&Notification<'_>) -> ValidationResult,
{
    let mut result = ValidationResult::SUCCESS;
    let _ = publisher.publish(entity, &mut |notification: &Notification<'_>| {
        if !notification.channel().includes_validator() {
            return ControlFlow::Continue(());
        }

        result = validate(notification);
        if result.is_success() {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    });
    result
}

/// Panics for a typed validator handed a notification it was not registered for.
pub(crate) fn misrouted(validator: &str, expected: impl Display, actual: impl Display) -> ! {
    panic!("validator {validator} registered for {expected} received {actual}")
}

/// Records an entity-level result in metrics and, unless successful, logs.
pub(crate) fn record_result(pass: &'static str, entity: &WeakEntityInfo<'_>, result: ValidationResult) {
    metric_inc!(
        VALIDATION_RESULTS,
        &[result.severity().as_str(), result.facility().label()]
    );

    if !result.is_success() {
        log_at_level!(
            result.log_level(),
            component = "validation",
            pass,
            entity_hash = %entity.hash_hex(),
            entity_type = ?entity.entity_type(),
            result = %result,
            "[Validation] Entity rejected"
        );
    }
}
