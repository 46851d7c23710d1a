use crate::domain::{Notification, WeakEntityInfo};
use shared_types::{EntityType, Transaction};
use std::ops::ControlFlow;

/// Receives notifications in publication order.
///
/// Returning `Break` stops the publisher; no further notifications are
/// delivered for the entity.
pub trait NotificationSubscriber {
    fn notify(&mut self, notification: &Notification<'_>) -> ControlFlow<()>;
}

impl<F> NotificationSubscriber for F
where
    F: FnMut(&Notification<'_>) -> ControlFlow<()>,
{
    fn notify(&mut self, notification: &Notification<'_>) -> ControlFlow<()> {
        self(notification)
    }
}

/// Decomposes an entity into its notification sequence.
///
/// Publication is deterministic: the same entity always yields the same
/// notifications in the same order.
pub trait NotificationPublisher: Send + Sync {
    fn publish(
        &self,
        entity: &WeakEntityInfo<'_>,
        subscriber: &mut dyn NotificationSubscriber,
    ) -> ControlFlow<()>;
}

/// Publishes the type-specific notifications of one transaction type.
pub trait TransactionPlugin: Send + Sync {
    fn entity_type(&self) -> EntityType;

    fn publish(
        &self,
        transaction: &Transaction,
        subscriber: &mut dyn NotificationSubscriber,
    ) -> ControlFlow<()>;
}
