use crate::domain::{
    BalanceReserveNotification, HashLockDurationNotification, HashLockMosaicNotification,
    HashLockNotification, Notification,
};
use crate::ports::{NotificationSubscriber, TransactionPlugin};
use shared_types::{EntityType, Transaction, TransactionBody};
use std::ops::ControlFlow;

pub struct HashLockPlugin;

impl TransactionPlugin for HashLockPlugin {
    fn entity_type(&self) -> EntityType {
        EntityType::HashLock
    }

    fn publish(
        &self,
        transaction: &Transaction,
        subscriber: &mut dyn NotificationSubscriber,
    ) -> ControlFlow<()> {
        let TransactionBody::HashLock {
            mosaic,
            duration,
            hash,
        } = &transaction.body
        else {
            panic!("HashLockPlugin invoked for {:?}", transaction.entity_type());
        };

        subscriber.notify(&Notification::HashLockDuration(HashLockDurationNotification {
            duration: *duration,
        }))?;
        subscriber.notify(&Notification::HashLockMosaic(HashLockMosaicNotification {
            mosaic: *mosaic,
        }))?;
        subscriber.notify(&Notification::BalanceReserve(BalanceReserveNotification {
            sender: &transaction.signer,
            mosaic_id: mosaic.id,
            amount: mosaic.amount,
        }))?;
        subscriber.notify(&Notification::HashLock(HashLockNotification {
            signer: &transaction.signer,
            mosaic: *mosaic,
            duration: *duration,
            hash,
        }))
    }
}
