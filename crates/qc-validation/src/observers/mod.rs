//! # Observers
//!
//! Observers execute an already validated entity into the open cache delta.
//! They receive observer-channel notifications in publication order.

pub mod account;
pub mod balance;
pub mod lock;

pub use account::{AccountAddressObserver, AccountPublicKeyObserver};
pub use balance::{BalanceReserveObserver, BalanceTransferObserver};
pub use lock::{HashLockObserver, SecretLockObserver};

use crate::domain::{
    Notification, NotificationKind, NotificationType, ObserverError, Payload, WeakEntityInfo,
};
use crate::ports::NotificationPublisher;
use crate::validators::DispatchIndex;
use qc_04_state_management::CacheDelta;
use quantum_telemetry::{log_entity_event, metric_inc, OBSERVER_ERRORS};
use shared_types::{Height, NetworkIdentifier};
use std::ops::ControlFlow;
use std::sync::Arc;

/// Mutable state handed to observers.
pub struct ObserverContext<'a> {
    pub height: Height,
    pub network: NetworkIdentifier,
    pub cache: &'a mut CacheDelta,
}

impl<'a> ObserverContext<'a> {
    pub fn new(height: Height, network: NetworkIdentifier, cache: &'a mut CacheDelta) -> Self {
        Self {
            height,
            network,
            cache,
        }
    }
}

pub trait NotificationObserver: Send + Sync {
    fn name(&self) -> &str;

    fn notify(
        &self,
        notification: &Notification<'_>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError>;
}

pub trait TypedObserver: Send + Sync + 'static {
    type Notification: NotificationKind;

    fn name(&self) -> &'static str;

    fn notify(
        &self,
        notification: &Payload<'_, Self::Notification>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError>;
}

pub trait EntityObserver: Send + Sync {
    fn name(&self) -> &str;

    fn notify(
        &self,
        entity: &WeakEntityInfo<'_>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError>;
}

/// Erases a [`TypedObserver`].
///
/// # Panics
///
/// When invoked with a notification of another type.
pub struct ErasedObserver<O>(O);

impl<O: TypedObserver> NotificationObserver for ErasedObserver<O> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn notify(
        &self,
        notification: &Notification<'_>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        match O::Notification::downcast(notification) {
            Some(payload) => self.0.notify(&payload, context),
            None => panic!(
                "observer {} registered for {} received {}",
                self.0.name(),
                <O::Notification as NotificationKind>::TYPE,
                notification.notification_type()
            ),
        }
    }
}

#[derive(Default)]
pub struct AggregateObserverBuilder {
    observers: Vec<(NotificationType, Box<dyn NotificationObserver>)>,
}

impl AggregateObserverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<O: TypedObserver>(mut self, observer: O) -> Self {
        self.observers.push((
            <O::Notification as NotificationKind>::TYPE,
            Box::new(ErasedObserver(observer)),
        ));
        self
    }

    pub fn build(self) -> AggregateNotificationObserver {
        let (index, observers) = DispatchIndex::build(self.observers);
        AggregateNotificationObserver { observers, index }
    }
}

/// Runs observers registered for a notification's type in registration
/// order; the first error aborts.
pub struct AggregateNotificationObserver {
    observers: Vec<Box<dyn NotificationObserver>>,
    index: DispatchIndex,
}

impl AggregateNotificationObserver {
    pub fn builder() -> AggregateObserverBuilder {
        AggregateObserverBuilder::new()
    }

    pub fn names(&self) -> Vec<&str> {
        self.observers.iter().map(|o| o.name()).collect()
    }
}

impl NotificationObserver for AggregateNotificationObserver {
    fn name(&self) -> &str {
        "AggregateNotificationObserver"
    }

    fn notify(
        &self,
        notification: &Notification<'_>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        for &i in self.index.lookup(notification.notification_type()) {
            self.observers[i].notify(notification, context)?;
        }
        Ok(())
    }
}

/// Executes an entity by publishing it to an observer.
pub struct NotificationObserverAdapter {
    observer: Box<dyn NotificationObserver>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl NotificationObserverAdapter {
    pub fn new(
        observer: Box<dyn NotificationObserver>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            observer,
            publisher,
        }
    }
}

impl EntityObserver for NotificationObserverAdapter {
    fn name(&self) -> &str {
        self.observer.name()
    }

    fn notify(
        &self,
        entity: &WeakEntityInfo<'_>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        let mut outcome = Ok(());
        let _ = self
            .publisher
            .publish(entity, &mut |notification: &Notification<'_>| {
                if !notification.channel().includes_observer() {
                    return ControlFlow::Continue(());
                }

                match self.observer.notify(notification, context) {
                    Ok(()) => ControlFlow::Continue(()),
                    Err(e) => {
                        outcome = Err(e);
                        ControlFlow::Break(())
                    }
                }
            });

        if let Err(e) = &outcome {
            metric_inc!(OBSERVER_ERRORS);
            log_entity_event!(
                error,
                "observer",
                "[Observer] Failed to execute entity",
                entity.hash_hex(),
                error = %e
            );
        }
        outcome
    }
}
