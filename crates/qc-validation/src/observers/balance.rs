use crate::domain::{
    kind, BalanceReserveNotification, BalanceTransferNotification, ObserverError,
};
use crate::observers::{ObserverContext, TypedObserver};
use qc_04_state_management::{AccountState, AccountStateCache, AccountStateCacheDelta, StateError};
use shared_types::Key;

fn resolve_sender<'d>(
    accounts: &'d mut AccountStateCacheDelta,
    sender: &Key,
) -> Result<&'d mut AccountState, ObserverError> {
    accounts
        .find_mut_by_key(sender)
        .ok_or_else(|| ObserverError::UnresolvableAccount {
            key: hex::encode(sender),
        })
}

/// Moves funds from the sender to the recipient.
pub struct BalanceTransferObserver;

impl TypedObserver for BalanceTransferObserver {
    type Notification = kind::BalanceTransfer;

    fn name(&self) -> &'static str {
        "BalanceTransferObserver"
    }

    fn notify(
        &self,
        notification: &BalanceTransferNotification<'_>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        let accounts = context.cache.sub_mut::<AccountStateCache>();
        resolve_sender(accounts, notification.sender)?
            .balances
            .debit(notification.mosaic_id, notification.amount)?;

        accounts.add_account_by_address(*notification.recipient, context.height);
        let recipient = accounts
            .find_mut_by_address(notification.recipient)
            .ok_or(StateError::AccountNotFound {
                address: *notification.recipient,
            })?;
        recipient
            .balances
            .credit(notification.mosaic_id, notification.amount)?;
        Ok(())
    }
}

/// Withdraws reserved funds from the sender.
pub struct BalanceReserveObserver;

impl TypedObserver for BalanceReserveObserver {
    type Notification = kind::BalanceReserve;

    fn name(&self) -> &'static str {
        "BalanceReserveObserver"
    }

    fn notify(
        &self,
        notification: &BalanceReserveNotification<'_>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        let accounts = context.cache.sub_mut::<AccountStateCache>();
        resolve_sender(accounts, notification.sender)?
            .balances
            .debit(notification.mosaic_id, notification.amount)?;
        Ok(())
    }
}
