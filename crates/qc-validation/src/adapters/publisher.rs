//! # Entity Notification Publisher
//!
//! Publication order for a transaction:
//!
//! 1. `CoreEntity`
//! 2. `CoreTransaction`
//! 3. `CoreSignature`
//! 4. `AccountPublicKey` for the signer
//! 5. the registered plugin's notifications
//!
//! Blocks publish `CoreEntity`, `CoreBlock`, `CoreSignature` and the
//! harvester's `AccountPublicKey`.

use crate::domain::{
    AccountPublicKeyNotification, BlockNotification, EntityNotification, EntityRef,
    Notification, RegistryError, SignatureNotification, TransactionNotification, WeakEntityInfo,
};
use crate::ports::{NotificationPublisher, NotificationSubscriber, TransactionPlugin};
use shared_types::{EntityType, Key};
use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, info};

/// Transaction plugins keyed by entity type.
#[derive(Default)]
pub struct TransactionRegistry {
    plugins: BTreeMap<EntityType, Box<dyn TransactionPlugin>>,
}

impl TransactionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn TransactionPlugin>) -> Result<(), RegistryError> {
        let entity_type = plugin.entity_type();
        if self.plugins.contains_key(&entity_type) {
            return Err(RegistryError::DuplicatePlugin { entity_type });
        }

        info!(entity_type = ?entity_type, "[Registry] Transaction plugin registered");
        self.plugins.insert(entity_type, plugin);
        Ok(())
    }

    pub fn find(&self, entity_type: EntityType) -> Option<&dyn TransactionPlugin> {
        self.plugins.get(&entity_type).map(|plugin| &**plugin)
    }

    /// Registered transaction types in ascending order.
    pub fn supported_types(&self) -> impl Iterator<Item = EntityType> + '_ {
        self.plugins.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Publishes core notifications and delegates the rest to plugins.
pub struct EntityNotificationPublisher {
    registry: Arc<TransactionRegistry>,
}

impl EntityNotificationPublisher {
    pub fn new(registry: Arc<TransactionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TransactionRegistry {
        &self.registry
    }

    fn publish_signer(
        signer: &Key,
        subscriber: &mut dyn NotificationSubscriber,
    ) -> ControlFlow<()> {
        subscriber.notify(&Notification::AccountPublicKey(
            AccountPublicKeyNotification { public_key: signer },
        ))
    }
}

impl NotificationPublisher for EntityNotificationPublisher {
    fn publish(
        &self,
        entity: &WeakEntityInfo<'_>,
        subscriber: &mut dyn NotificationSubscriber,
    ) -> ControlFlow<()> {
        match entity.entity() {
            EntityRef::Transaction(transaction) => {
                let entity_type = transaction.entity_type();
                subscriber.notify(&Notification::CoreEntity(EntityNotification {
                    network: transaction.network,
                    entity_type,
                    version: transaction.version,
                }))?;
                subscriber.notify(&Notification::CoreTransaction(TransactionNotification {
                    signer: &transaction.signer,
                    transaction_hash: entity.hash(),
                    entity_type,
                    deadline: transaction.deadline,
                }))?;
                subscriber.notify(&Notification::CoreSignature(SignatureNotification {
                    signer: &transaction.signer,
                    signature: &transaction.signature,
                    data: entity.hash(),
                }))?;
                Self::publish_signer(&transaction.signer, subscriber)?;

                match self.registry.find(entity_type) {
                    Some(plugin) => plugin.publish(transaction, subscriber),
                    None => {
                        debug!(
                            entity_type = ?entity_type,
                            "[Publisher] No plugin registered, publishing core notifications only"
                        );
                        ControlFlow::Continue(())
                    }
                }
            }
            EntityRef::Block(header) => {
                subscriber.notify(&Notification::CoreEntity(EntityNotification {
                    network: header.network,
                    entity_type: EntityType::Block,
                    version: header.version,
                }))?;
                subscriber.notify(&Notification::CoreBlock(BlockNotification {
                    signer: &header.signer,
                    height: header.height,
                    timestamp: header.timestamp,
                }))?;
                subscriber.notify(&Notification::CoreSignature(SignatureNotification {
                    signer: &header.signer,
                    signature: &header.signature,
                    data: entity.hash(),
                }))?;
                Self::publish_signer(&header.signer, subscriber)
            }
        }
    }
}
