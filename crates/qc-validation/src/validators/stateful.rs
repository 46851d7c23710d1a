//! # Stateful Validation
//!
//! Checks against ledger state. Every validator in one pass over an entity
//! sees the same [`ValidatorContext`], so they all read one consistent
//! snapshot.

use crate::domain::{
    Notification, NotificationKind, NotificationType, Payload, ValidationResult, WeakEntityInfo,
};
use crate::ports::NotificationPublisher;
use crate::validators::{
    first_non_success, misrouted, record_result, validate_published, DispatchIndex,
};
use qc_04_state_management::ReadOnlyCache;
use shared_types::{Height, NetworkIdentifier, Timestamp};
use std::sync::Arc;

/// Chain position and state visible to stateful validators.
#[derive(Clone, Copy)]
pub struct ValidatorContext<'a> {
    pub height: Height,
    pub block_time: Timestamp,
    pub network: NetworkIdentifier,
    pub cache: ReadOnlyCache<'a>,
}

impl<'a> ValidatorContext<'a> {
    pub fn new(
        height: Height,
        block_time: Timestamp,
        network: NetworkIdentifier,
        cache: impl Into<ReadOnlyCache<'a>>,
    ) -> Self {
        Self {
            height,
            block_time,
            network,
            cache: cache.into(),
        }
    }
}

pub trait NotificationValidator: Send + Sync {
    fn name(&self) -> &str;

    fn validate(
        &self,
        notification: &Notification<'_>,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult;
}

pub trait TypedValidator: Send + Sync + 'static {
    type Notification: NotificationKind;

    fn name(&self) -> &'static str;

    fn validate(
        &self,
        notification: &Payload<'_, Self::Notification>,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult;
}

pub trait EntityValidator: Send + Sync {
    fn name(&self) -> &str;

    fn validate(&self, entity: &WeakEntityInfo<'_>, context: &ValidatorContext<'_>)
        -> ValidationResult;
}

/// Erases a stateful [`TypedValidator`].
///
/// # Panics
///
/// When invoked with a notification of another type.
pub struct ErasedValidator<V>(V);

impl<V: TypedValidator> NotificationValidator for ErasedValidator<V> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn validate(
        &self,
        notification: &Notification<'_>,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        match V::Notification::downcast(notification) {
            Some(payload) => self.0.validate(&payload, context),
            None => misrouted(
                self.0.name(),
                <V::Notification as NotificationKind>::TYPE,
                notification.notification_type(),
            ),
        }
    }
}

#[derive(Default)]
pub struct AggregateValidatorBuilder {
    validators: Vec<(NotificationType, Box<dyn NotificationValidator>)>,
}

impl AggregateValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<V: TypedValidator>(self, validator: V) -> Self {
        self.add_boxed(
            <V::Notification as NotificationKind>::TYPE,
            Box::new(ErasedValidator(validator)),
        )
    }

    pub fn add_boxed(
        mut self,
        notification_type: NotificationType,
        validator: Box<dyn NotificationValidator>,
    ) -> Self {
        self.validators.push((notification_type, validator));
        self
    }

    pub fn build(self) -> AggregateNotificationValidator {
        let (index, validators) = DispatchIndex::build(self.validators);
        AggregateNotificationValidator { validators, index }
    }
}

pub struct AggregateNotificationValidator {
    validators: Vec<Box<dyn NotificationValidator>>,
    index: DispatchIndex,
}

impl AggregateNotificationValidator {
    pub fn builder() -> AggregateValidatorBuilder {
        AggregateValidatorBuilder::new()
    }

    pub fn names(&self) -> Vec<&str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl NotificationValidator for AggregateNotificationValidator {
    fn name(&self) -> &str {
        "AggregateNotificationValidator"
    }

    fn validate(
        &self,
        notification: &Notification<'_>,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        first_non_success(
            self.index
                .lookup(notification.notification_type())
                .iter()
                .map(|&i| self.validators[i].validate(notification, context)),
        )
    }
}

pub struct NotificationValidatorAdapter {
    validator: Box<dyn NotificationValidator>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl NotificationValidatorAdapter {
    pub fn new(
        validator: Box<dyn NotificationValidator>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            validator,
            publisher,
        }
    }
}

impl EntityValidator for NotificationValidatorAdapter {
    fn name(&self) -> &str {
        self.validator.name()
    }

    fn validate(
        &self,
        entity: &WeakEntityInfo<'_>,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        let result = validate_published(self.publisher.as_ref(), entity, |notification| {
            self.validator.validate(notification, context)
        });
        record_result("stateful", entity, result);
        result
    }
}
