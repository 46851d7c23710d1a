//! # Stateless Validation
//!
//! Checks that depend only on the entity itself. Safe to run for many
//! entities in parallel.

use crate::domain::{
    Notification, NotificationKind, NotificationType, Payload, ValidationResult, WeakEntityInfo,
};
use crate::ports::NotificationPublisher;
use crate::validators::{
    first_non_success, misrouted, record_result, validate_published, DispatchIndex,
};
use std::sync::Arc;

/// Validates one notification of any type.
pub trait NotificationValidator: Send + Sync {
    fn name(&self) -> &str;

    fn validate(&self, notification: &Notification<'_>) -> ValidationResult;
}

/// Validates notifications of a single kind.
pub trait TypedValidator: Send + Sync + 'static {
    type Notification: NotificationKind;

    fn name(&self) -> &'static str;

    fn validate(&self, notification: &Payload<'_, Self::Notification>) -> ValidationResult;
}

/// Validates a whole entity.
pub trait EntityValidator: Send + Sync {
    fn name(&self) -> &str;

    fn validate(&self, entity: &WeakEntityInfo<'_>) -> ValidationResult;
}

/// Erases a [`TypedValidator`] into a [`NotificationValidator`].
///
/// # Panics
///
/// When invoked with a notification of another type. The aggregate never
/// does this; hitting it means the pipeline was wired incorrectly.
pub struct ErasedValidator<V>(V);

impl<V: TypedValidator> NotificationValidator for ErasedValidator<V> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn validate(&self, notification: &Notification<'_>) -> ValidationResult {
        match V::Notification::downcast(notification) {
            Some(payload) => self.0.validate(&payload),
            None => misrouted(
                self.0.name(),
                <V::Notification as NotificationKind>::TYPE,
                notification.notification_type(),
            ),
        }
    }
}

/// Collects validators by notification type.
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

    /// Registers an untyped validator for `notification_type` only.
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

/// Runs every validator registered for a notification's type, in
/// registration order, stopping at the first non-success.
pub struct AggregateNotificationValidator {
    validators: Vec<Box<dyn NotificationValidator>>,
    index: DispatchIndex,
}

impl AggregateNotificationValidator {
    pub fn builder() -> AggregateValidatorBuilder {
        AggregateValidatorBuilder::new()
    }

    /// Validator names in registration order.
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

    fn validate(&self, notification: &Notification<'_>) -> ValidationResult {
        first_non_success(
            self.index
                .lookup(notification.notification_type())
                .iter()
                .map(|&i| self.validators[i].validate(notification)),
        )
    }
}

/// Validates an entity by publishing it and checking each validator-channel
/// notification.
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

    fn validate(&self, entity: &WeakEntityInfo<'_>) -> ValidationResult {
        let result = validate_published(self.publisher.as_ref(), entity, |notification| {
            self.validator.validate(notification)
        });
        record_result("stateless", entity, result);
        result
    }
}
