use crate::domain::{
    AccountAddressNotification, BalanceReserveNotification, Notification,
    SecretLockDurationNotification, SecretLockHashAlgorithmNotification, SecretLockNotification,
};
use crate::ports::{NotificationSubscriber, TransactionPlugin};
use shared_types::{EntityType, Transaction, TransactionBody};
use std::ops::ControlFlow;

/// Publishes five notifications: recipient, duration, algorithm, the
/// reservation of the locked funds and the lock itself.
pub struct SecretLockPlugin;

impl TransactionPlugin for SecretLockPlugin {
    fn entity_type(&self) -> EntityType {
        EntityType::SecretLock
    }

    fn publish(
        &self,
        transaction: &Transaction,
        subscriber: &mut dyn NotificationSubscriber,
    ) -> ControlFlow<()> {
        let TransactionBody::SecretLock {
            mosaic,
            duration,
            hash_algorithm,
            secret,
            recipient,
        } = &transaction.body
        else {
            panic!("SecretLockPlugin invoked for {:?}", transaction.entity_type());
        };

        subscriber.notify(&Notification::AccountAddress(AccountAddressNotification {
            address: recipient,
        }))?;
        subscriber.notify(&Notification::SecretLockDuration(
            SecretLockDurationNotification {
                duration: *duration,
            },
        ))?;
        subscriber.notify(&Notification::SecretLockHashAlgorithm(
            SecretLockHashAlgorithmNotification {
                hash_algorithm: *hash_algorithm,
            },
        ))?;
        subscriber.notify(&Notification::BalanceReserve(BalanceReserveNotification {
            sender: &transaction.signer,
            mosaic_id: mosaic.id,
            amount: mosaic.amount,
        }))?;
        subscriber.notify(&Notification::SecretLock(SecretLockNotification {
            signer: &transaction.signer,
            mosaic: *mosaic,
            duration: *duration,
            hash_algorithm: *hash_algorithm,
            secret,
            recipient,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Mosaic;

    #[test]
    fn test_publishes_five_notifications_with_one_address() {
        let recipient = [9u8; 25];
        let transaction =
            crate::test_utils::secret_lock(Mosaic::new(3, 100), 20, 0, [4u8; 32], recipient);
        let mut count = 0;
        let mut addresses = Vec::new();
        let mut algorithm = None;

        let _ = SecretLockPlugin.publish(&transaction, &mut |notification: &Notification<'_>| {
            count += 1;
            match notification {
                Notification::AccountAddress(n) => addresses.push(*n.address),
                Notification::SecretLockHashAlgorithm(n) => algorithm = Some(n.hash_algorithm),
                _ => {}
            }
            ControlFlow::Continue(())
        });

        assert_eq!(count, 5);
        assert_eq!(addresses, vec![recipient]);
        assert_eq!(algorithm, Some(0));
    }
}
