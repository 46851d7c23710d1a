//! # State Flows
//!
//! Snapshot isolation and writer exclusivity as seen from block processing.

use super::fixtures::{processor, registry, Account, BLOCK_TIME, CURRENCY};
use qc_04_state_management::{
    AccountState, AccountStateCache, BaseSet, LockInfoCache, ReadOnlySet, StateCache, StateError,
};
use qc_validation::{
    ConfigError, EntityProcessor, ProcessingError, ValidationConfig, ValidationPipeline,
    WeakEntityInfo,
};
use shared_types::{public_key_to_address, NetworkIdentifier};
use std::sync::Arc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;

#[test]
fn test_view_outlives_commit_unchanged() {
    let alice = Account::new(1);
    let bob = Account::new(2);
    let processor = processor(vec![alice.funded(100)]);
    let before = processor.state().create_view();

    let block = Account::new(9).block(2, vec![alice.transfer(bob.address(), &[(CURRENCY, 25)])]);
    assert!(processor.process_block(&block).unwrap().is_committed());

    let old = before.sub::<AccountStateCache>();
    assert_eq!(before.height(), 0);
    assert_eq!(old.find_by_address(&alice.address()).unwrap().balances.get(CURRENCY), 100);
    assert!(old.find_by_address(&bob.address()).is_none());

    let after = processor.state().create_view();
    let new = after.sub::<AccountStateCache>();
    assert_eq!(new.find_by_address(&alice.address()).unwrap().balances.get(CURRENCY), 75);
    assert_eq!(new.find_by_address(&bob.address()).unwrap().balances.get(CURRENCY), 25);
}

#[test]
fn test_check_ignores_uncommitted_delta() {
    let alice = Account::new(1);
    let bob = Account::new(2);
    let processor = processor(Vec::new());

    // bob is only funded inside an open delta
    let mut delta = processor.state().create_delta().unwrap();
    {
        let accounts = delta.sub_mut::<AccountStateCache>();
        accounts.add_account_by_address(bob.address(), 1);
        accounts
            .find_mut_by_address(&bob.address())
            .unwrap()
            .balances
            .credit(CURRENCY, 10)
            .unwrap();
    }

    let transaction = bob.transfer(alice.address(), &[(CURRENCY, 5)]);
    let entity = WeakEntityInfo::from_transaction(&transaction);
    let result = processor.check(&entity, 2, BLOCK_TIME);
    assert!(result.is_failure());

    let block = Account::new(9).block(2, vec![transaction.clone()]);
    assert_eq!(
        processor.process_block(&block),
        Err(ProcessingError::State(StateError::DeltaAlreadyOpen))
    );

    processor.state().commit(delta).unwrap();
    assert!(processor.check(&entity, 2, BLOCK_TIME).is_success());
}

#[test]
fn test_processor_requires_matching_account_network() {
    let alice = Account::new(1);
    let funded = AccountState::new(public_key_to_address(&alice.key(), NetworkIdentifier::Mainnet), 1)
        .with_balance(CURRENCY, 100)
        .unwrap();
    let state = Arc::new(
        StateCache::builder()
            .with_sub_cache(AccountStateCache::with_accounts(NetworkIdentifier::Mainnet, vec![funded]))
            .with_sub_cache(LockInfoCache::new())
            .build()
            .unwrap(),
    );

    let testnet = ValidationPipeline::with_defaults(&ValidationConfig::default(), registry());
    assert!(matches!(
        EntityProcessor::new(testnet, Arc::clone(&state)),
        Err(ConfigError::NetworkMismatch {
            pipeline: NetworkIdentifier::Testnet,
            cache: NetworkIdentifier::Mainnet,
        })
    ));

    let mainnet = ValidationPipeline::with_defaults(
        &ValidationConfig::default().with_network(NetworkIdentifier::Mainnet),
        registry(),
    );
    let processor = EntityProcessor::new(mainnet, state).unwrap();
    let view = processor.state().create_view();
    let accounts = view.sub::<AccountStateCache>();
    assert_eq!(accounts.network_identifier(), NetworkIdentifier::Mainnet);
}

#[test]
fn test_delta_set_matches_model_under_random_edits() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut base: BaseSet<u8, u32> = (0..32u8).map(|k| (k, u32::from(k))).collect();
    let mut model: HashMap<u8, u32> = (0..32u8).map(|k| (k, u32::from(k))).collect();

    for _ in 0..8 {
        let snapshot = base.view();
        let frozen = model.clone();
        let mut delta = base.rebase();

        for _ in 0..200 {
            let key = rng.gen_range(0..48u8);
            if rng.gen_bool(0.4) {
                assert_eq!(delta.remove(&key), model.remove(&key).is_some());
            } else {
                let value = rng.gen::<u32>();
                delta.insert(key, value);
                model.insert(key, value);
            }
        }

        assert_eq!(delta.len(), model.len());
        for key in 0..48u8 {
            assert_eq!(delta.find(&key), model.get(&key), "key {key}");
        }

        base.commit(delta);
        assert_eq!(base.len(), model.len());
        for key in 0..48u8 {
            assert_eq!(snapshot.find(&key), frozen.get(&key), "snapshot key {key}");
        }
    }
}
