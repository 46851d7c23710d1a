use crate::domain::{
    kind, AccountAddressNotification, AccountPublicKeyNotification, ObserverError,
};
use crate::observers::{ObserverContext, TypedObserver};
use qc_04_state_management::AccountStateCache;

/// Registers recipient addresses.
pub struct AccountAddressObserver;

impl TypedObserver for AccountAddressObserver {
    type Notification = kind::AccountAddress;

    fn name(&self) -> &'static str {
        "AccountAddressObserver"
    }

    fn notify(
        &self,
        notification: &AccountAddressNotification<'_>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        context
            .cache
            .sub_mut::<AccountStateCache>()
            .add_account_by_address(*notification.address, context.height);
        Ok(())
    }
}

/// Registers signer keys, linking them to accounts already known by the
/// derived address.
pub struct AccountPublicKeyObserver;

impl TypedObserver for AccountPublicKeyObserver {
    type Notification = kind::AccountPublicKey;

    fn name(&self) -> &'static str {
        "AccountPublicKeyObserver"
    }

    fn notify(
        &self,
        notification: &AccountPublicKeyNotification<'_>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        context
            .cache
            .sub_mut::<AccountStateCache>()
            .add_account_by_key(*notification.public_key, context.height);
        Ok(())
    }
}
