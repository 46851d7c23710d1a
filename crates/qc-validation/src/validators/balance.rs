//! # Balance Validators
//!
//! Both validators resolve the sender through the account cache, by public
//! key first and then by the address derived on the cache's network. An
//! unresolvable sender has no balance.

use crate::domain::{
    kind, BalanceReserveNotification, BalanceTransferNotification, ValidationResult,
};
use crate::validators::{stateful, ValidatorContext};
use qc_04_state_management::ReadOnlyAccountStateCache;
use shared_types::{Amount, Key, MosaicId};

fn check_balance(
    context: &ValidatorContext<'_>,
    sender: &Key,
    mosaic_id: MosaicId,
    amount: Amount,
) -> ValidationResult {
    let accounts: ReadOnlyAccountStateCache<'_> = context.cache.sub();
    match accounts.resolve(sender) {
        Some(account) if account.balances.get(mosaic_id) >= amount => ValidationResult::SUCCESS,
        _ => ValidationResult::FAILURE_CORE_INSUFFICIENT_BALANCE,
    }
}

pub struct BalanceTransferValidator;

impl stateful::TypedValidator for BalanceTransferValidator {
    type Notification = kind::BalanceTransfer;

    fn name(&self) -> &'static str {
        "BalanceTransferValidator"
    }

    fn validate(
        &self,
        notification: &BalanceTransferNotification<'_>,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        check_balance(
            context,
            notification.sender,
            notification.mosaic_id,
            notification.amount,
        )
    }
}

pub struct BalanceReserveValidator;

impl stateful::TypedValidator for BalanceReserveValidator {
    type Notification = kind::BalanceReserve;

    fn name(&self) -> &'static str {
        "BalanceReserveValidator"
    }

    fn validate(
        &self,
        notification: &BalanceReserveNotification<'_>,
        context: &ValidatorContext<'_>,
    ) -> ValidationResult {
        check_balance(
            context,
            notification.sender,
            notification.mosaic_id,
            notification.amount,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{state_cache, state_cache_on, BLOCK_TIME, NETWORK};
    use crate::validators::stateful::TypedValidator as _;
    use qc_04_state_management::{AccountState, AccountStateCache};
    use shared_types::{public_key_to_address, NetworkIdentifier};

    const MOSAIC: MosaicId = 1234;

    fn transfer<'a>(sender: &'a Key, recipient: &'a [u8; 25], amount: Amount) -> BalanceTransferNotification<'a> {
        BalanceTransferNotification {
            sender,
            recipient,
            mosaic_id: MOSAIC,
            amount,
        }
    }

    #[test]
    fn test_balance_via_derived_address() {
        let sender = [7u8; 32];
        let recipient = [0u8; 25];
        let account = AccountState::new(public_key_to_address(&sender, NETWORK), 1)
            .with_balance(MOSAIC, 100)
            .unwrap();
        let cache = state_cache(vec![account]);
        let view = cache.create_view();
        let context = ValidatorContext::new(2, BLOCK_TIME, NETWORK, &view);

        let validator = BalanceTransferValidator;
        assert_eq!(
            validator.validate(&transfer(&sender, &recipient, 100), &context),
            ValidationResult::SUCCESS
        );
        assert_eq!(
            validator.validate(&transfer(&sender, &recipient, 101), &context),
            ValidationResult::FAILURE_CORE_INSUFFICIENT_BALANCE
        );
        assert_eq!(
            validator.validate(&transfer(&[8u8; 32], &recipient, 1), &context),
            ValidationResult::FAILURE_CORE_INSUFFICIENT_BALANCE
        );
    }

    #[test]
    fn test_derived_address_follows_cache_network() {
        let sender = [7u8; 32];
        let recipient = [0u8; 25];
        let account = AccountState::new(public_key_to_address(&sender, NetworkIdentifier::Mainnet), 1)
            .with_balance(MOSAIC, 100)
            .unwrap();
        let cache = state_cache_on(NetworkIdentifier::Mainnet, vec![account]);
        let view = cache.create_view();
        let context = ValidatorContext::new(2, BLOCK_TIME, NETWORK, &view);

        // observers derive on the cache network, so the validator must too
        assert!(BalanceTransferValidator
            .validate(&transfer(&sender, &recipient, 60), &context)
            .is_success());
    }

    #[test]
    fn test_missing_mosaic_counts_as_zero() {
        let sender = [7u8; 32];
        let mut account = AccountState::new(public_key_to_address(&sender, NETWORK), 1);
        account.public_key = Some(sender);
        let cache = state_cache(vec![account]);
        let view = cache.create_view();
        let context = ValidatorContext::new(2, BLOCK_TIME, NETWORK, &view);

        let reserve = |amount| BalanceReserveNotification {
            sender: &sender,
            mosaic_id: MOSAIC,
            amount,
        };
        assert!(BalanceReserveValidator.validate(&reserve(0), &context).is_success());
        assert_eq!(
            BalanceReserveValidator.validate(&reserve(1), &context),
            ValidationResult::FAILURE_CORE_INSUFFICIENT_BALANCE
        );
    }

    #[test]
    fn test_current_view_sees_uncommitted_credit() {
        let sender = [7u8; 32];
        let recipient = [0u8; 25];
        let cache = state_cache(Vec::new());
        let mut delta = cache.create_delta().unwrap();
        {
            let accounts = delta.sub_mut::<AccountStateCache>();
            accounts.add_account_by_key(sender, 1);
            accounts
                .find_mut_by_key(&sender)
                .unwrap()
                .balances
                .credit(MOSAIC, 50)
                .unwrap();
        }

        let context = ValidatorContext::new(2, BLOCK_TIME, NETWORK, &delta);
        assert!(BalanceTransferValidator
            .validate(&transfer(&sender, &recipient, 50), &context)
            .is_success());

        let view = cache.create_view();
        let committed = ValidatorContext::new(2, BLOCK_TIME, NETWORK, &view);
        assert_eq!(
            BalanceTransferValidator.validate(&transfer(&sender, &recipient, 50), &committed),
            ValidationResult::FAILURE_CORE_INSUFFICIENT_BALANCE
        );
    }
}
