use crate::domain::{
    AccountAddressNotification, BalanceTransferNotification, Notification,
    TransferMessageNotification, TransferMosaicsNotification,
};
use crate::ports::{NotificationSubscriber, TransactionPlugin};
use shared_types::{EntityType, Transaction, TransactionBody};
use std::ops::ControlFlow;

/// Publishes recipient, message, mosaics, then one balance transfer per
/// mosaic.
pub struct TransferPlugin;

impl TransactionPlugin for TransferPlugin {
    fn entity_type(&self) -> EntityType {
        EntityType::Transfer
    }

    fn publish(
        &self,
        transaction: &Transaction,
        subscriber: &mut dyn NotificationSubscriber,
    ) -> ControlFlow<()> {
        let TransactionBody::Transfer {
            recipient,
            message,
            mosaics,
        } = &transaction.body
        else {
            panic!("TransferPlugin invoked for {:?}", transaction.entity_type());
        };

        subscriber.notify(&Notification::AccountAddress(AccountAddressNotification {
            address: recipient,
        }))?;
        subscriber.notify(&Notification::TransferMessage(TransferMessageNotification {
            message_size: message.len(),
        }))?;
        subscriber.notify(&Notification::TransferMosaics(TransferMosaicsNotification {
            mosaics: mosaics.as_slice(),
        }))?;

        for mosaic in mosaics {
            subscriber.notify(&Notification::BalanceTransfer(BalanceTransferNotification {
                sender: &transaction.signer,
                recipient,
                mosaic_id: mosaic.id,
                amount: mosaic.amount,
            }))?;
        }

        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::transfer;

    #[test]
    fn test_publishes_transfer_per_mosaic() {
        let transaction = transfer(&[(1, 10), (5, 50)]);
        let mut transfers = Vec::new();
        let mut message_size = None;

        let _ = TransferPlugin.publish(&transaction, &mut |notification: &Notification<'_>| {
            match notification {
                Notification::BalanceTransfer(n) => transfers.push((n.mosaic_id, n.amount)),
                Notification::TransferMessage(n) => message_size = Some(n.message_size),
                _ => {}
            }
            ControlFlow::Continue(())
        });

        assert_eq!(transfers, vec![(1, 10), (5, 50)]);
        assert_eq!(message_size, Some(5));
    }
}
