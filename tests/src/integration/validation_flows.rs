//! # Validation Flows
//!
//! Blocks travel the full pipeline: publisher → stateless validators →
//! stateful validators over the open delta → observers → commit.

use super::fixtures::{
    processor, registry, state, Account, BLOCK_TIME, CURRENCY, LOCK_FUNDS, NETWORK,
};
use qc_04_state_management::{secret_lock_key, AccountStateCache, LockInfoCache, LockKind};
use qc_validation::observers::{AggregateNotificationObserver, NotificationObserverAdapter};
use qc_validation::validators::{stateful, stateless};
use qc_validation::{
    BatchValidator, EntityNotificationPublisher, EntityPosition, EntityProcessor, Notification,
    NotificationPublisher, NotificationType, ProcessingOutcome, ValidationConfig,
    ValidationPipeline, ValidationResult, WeakEntityInfo,
};
use shared_types::NetworkIdentifier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// BALANCES
// =============================================================================

#[test]
fn test_transfer_moves_funds_and_registers_accounts() {
    let alice = Account::new(1);
    let bob = Account::new(2);
    let harvester = Account::new(9);
    let processor = processor(vec![alice.funded(100)]);

    let block = harvester.block(2, vec![alice.transfer(bob.address(), &[(CURRENCY, 60)])]);
    match processor.process_block(&block).unwrap() {
        ProcessingOutcome::Committed(summary) => assert_eq!(summary.height, 2),
        other => panic!("expected commit, got {other:?}"),
    }

    let view = processor.state().create_view();
    let accounts = view.sub::<AccountStateCache>();
    let recipient = accounts.find_by_address(&bob.address()).unwrap();
    assert_eq!(recipient.balances.get(CURRENCY), 60);
    assert_eq!(recipient.address_height, 2);
    assert!(recipient.public_key.is_none());

    // the sender's key was linked to its existing address
    let sender = accounts.find_by_key(&alice.key()).unwrap();
    assert_eq!(sender.address, alice.address());
    assert_eq!(sender.balances.get(CURRENCY), 40);

    assert!(accounts.find_by_key(&harvester.key()).is_some());
}

#[test]
fn test_overdraft_in_later_block_is_rejected() {
    let alice = Account::new(1);
    let bob = Account::new(2);
    let harvester = Account::new(9);
    let processor = processor(vec![alice.funded(100)]);

    let first = harvester.block(2, vec![alice.transfer(bob.address(), &[(CURRENCY, 60)])]);
    assert!(processor.process_block(&first).unwrap().is_committed());

    let second = harvester.block(3, vec![alice.transfer(bob.address(), &[(CURRENCY, 50)])]);
    assert_eq!(
        processor.process_block(&second).unwrap(),
        ProcessingOutcome::Rejected {
            entity: EntityPosition::Transaction(0),
            result: ValidationResult::FAILURE_CORE_INSUFFICIENT_BALANCE,
        }
    );

    let view = processor.state().create_view();
    assert_eq!(view.height(), 2);
    let accounts = view.sub::<AccountStateCache>();
    assert_eq!(
        accounts.find_by_address(&alice.address()).unwrap().balances.get(CURRENCY),
        40
    );
}

#[test]
fn test_received_funds_spendable_in_same_block() {
    let alice = Account::new(1);
    let bob = Account::new(2);
    let carol = Account::new(3);
    let processor = processor(vec![alice.funded(100)]);

    let block = Account::new(9).block(
        2,
        vec![
            alice.transfer(bob.address(), &[(CURRENCY, 70)]),
            bob.transfer(carol.address(), &[(CURRENCY, 30)]),
        ],
    );
    assert!(processor.process_block(&block).unwrap().is_committed());

    let view = processor.state().create_view();
    let accounts = view.sub::<AccountStateCache>();
    assert_eq!(accounts.find_by_key(&bob.key()).unwrap().balances.get(CURRENCY), 40);
    assert_eq!(
        accounts.find_by_address(&carol.address()).unwrap().balances.get(CURRENCY),
        30
    );
}

// =============================================================================
// ENTITY RULES
// =============================================================================

#[test]
fn test_entity_rules_reject_block() {
    let alice = Account::new(1);
    let bob = Account::new(2);
    let harvester = Account::new(9);

    let mut tampered = alice.transfer(bob.address(), &[(CURRENCY, 1)]);
    tampered.signature[0] ^= 0xFF;

    let mut foreign = alice.transfer(bob.address(), &[(CURRENCY, 1)]);
    foreign.network = NetworkIdentifier::Mainnet;
    let foreign = alice.resign(foreign);

    let mut expired = alice.transfer(bob.address(), &[(CURRENCY, 1)]);
    expired.deadline = BLOCK_TIME - 1;
    let expired = alice.resign(expired);

    let mut future = alice.transfer(bob.address(), &[(CURRENCY, 1)]);
    future.deadline = BLOCK_TIME + 86_400_001;
    let future = alice.resign(future);

    let unordered = alice.transfer(bob.address(), &[(2, 1), (1, 1)]);

    let cases = [
        (tampered, ValidationResult::FAILURE_CORE_SIGNATURE_NOT_VERIFIABLE),
        (foreign, ValidationResult::FAILURE_CORE_WRONG_NETWORK),
        (expired, ValidationResult::FAILURE_CORE_PAST_DEADLINE),
        (future, ValidationResult::FAILURE_CORE_FUTURE_DEADLINE),
        (unordered, ValidationResult::FAILURE_TRANSFER_OUT_OF_ORDER_MOSAICS),
    ];

    for (transaction, expected) in cases {
        let processor = processor(vec![alice.funded(100)]);
        let block = harvester.block(2, vec![transaction]);
        assert_eq!(
            processor.process_block(&block).unwrap(),
            ProcessingOutcome::Rejected {
                entity: EntityPosition::Transaction(0),
                result: expected,
            }
        );
    }
}

#[test]
fn test_bad_header_rejects_before_transactions() {
    let alice = Account::new(1);
    let processor = processor(vec![alice.funded(100)]);

    let mut block = Account::new(9).block(2, vec![alice.transfer([7u8; 25], &[(CURRENCY, 1)])]);
    block.header.version = 2;

    assert_eq!(
        processor.process_block(&block).unwrap(),
        ProcessingOutcome::Rejected {
            entity: EntityPosition::BlockHeader,
            result: ValidationResult::FAILURE_CORE_INVALID_VERSION,
        }
    );
}

// =============================================================================
// LOCKS
// =============================================================================

#[test]
fn test_hash_lock_reserves_collateral_once() {
    let alice = Account::new(1);
    let harvester = Account::new(9);
    let processor = processor(vec![alice.funded(3 * LOCK_FUNDS)]);
    let guarded = [0xABu8; 32];

    let block = harvester.block(5, vec![alice.hash_lock(100, guarded)]);
    assert!(processor.process_block(&block).unwrap().is_committed());

    let view = processor.state().create_view();
    let lock = view.sub::<LockInfoCache>().find(&guarded).unwrap();
    assert_eq!(lock.end_height, 105);
    assert_eq!(lock.sender, alice.key());
    assert_eq!(
        view.sub::<AccountStateCache>()
            .find_by_key(&alice.key())
            .unwrap()
            .balances
            .get(CURRENCY),
        2 * LOCK_FUNDS
    );

    let replay = harvester.block(6, vec![alice.hash_lock(100, guarded)]);
    assert_eq!(
        processor.process_block(&replay).unwrap(),
        ProcessingOutcome::Rejected {
            entity: EntityPosition::Transaction(0),
            result: ValidationResult::FAILURE_LOCKHASH_HASH_ALREADY_EXISTS,
        }
    );
}

#[test]
fn test_duplicate_hash_lock_in_one_block_sees_delta() {
    let alice = Account::new(1);
    let processor = processor(vec![alice.funded(3 * LOCK_FUNDS)]);
    let guarded = [0x11u8; 32];

    let block = Account::new(9).block(
        2,
        vec![alice.hash_lock(10, guarded), alice.hash_lock(20, guarded)],
    );
    assert_eq!(
        processor.process_block(&block).unwrap(),
        ProcessingOutcome::Rejected {
            entity: EntityPosition::Transaction(1),
            result: ValidationResult::FAILURE_LOCKHASH_HASH_ALREADY_EXISTS,
        }
    );
}

#[test]
fn test_hash_lock_duration_bounds() {
    let alice = Account::new(1);

    for (duration, expected) in [
        (0, Some(ValidationResult::FAILURE_LOCKHASH_INVALID_DURATION)),
        (5760, None),
        (5761, Some(ValidationResult::FAILURE_LOCKHASH_INVALID_DURATION)),
    ] {
        let processor = processor(vec![alice.funded(LOCK_FUNDS)]);
        let block = Account::new(9).block(2, vec![alice.hash_lock(duration, [duration as u8; 32])]);
        let outcome = processor.process_block(&block).unwrap();

        match expected {
            None => assert!(outcome.is_committed(), "duration {duration}: {outcome:?}"),
            Some(result) => assert_eq!(
                outcome,
                ProcessingOutcome::Rejected {
                    entity: EntityPosition::Transaction(0),
                    result,
                }
            ),
        }
    }
}

#[test]
fn test_secret_lock_escrows_without_crediting_recipient() {
    let alice = Account::new(1);
    let bob = Account::new(2);
    let processor = processor(vec![alice.funded(500)]);
    let secret = [0x5Eu8; 32];

    let block = Account::new(9).block(
        4,
        vec![alice.secret_lock(200, 50, secret, bob.address())],
    );
    assert!(processor.process_block(&block).unwrap().is_committed());

    let view = processor.state().create_view();
    let accounts = view.sub::<AccountStateCache>();
    assert_eq!(accounts.find_by_key(&alice.key()).unwrap().balances.get(CURRENCY), 300);
    assert_eq!(
        accounts.find_by_address(&bob.address()).unwrap().balances.get(CURRENCY),
        0
    );

    let lock = view
        .sub::<LockInfoCache>()
        .find(&secret_lock_key(&secret, &bob.address()))
        .unwrap();
    assert_eq!(lock.end_height, 54);
    assert_eq!(lock.mosaic.amount, 200);
    assert!(matches!(lock.kind, LockKind::Secret { recipient, .. } if recipient == bob.address()));
}

// =============================================================================
// CHAIN MECHANICS
// =============================================================================

/// Counts every call and fails the `fail_at`-th one (1-based, 0 = never).
struct CountingValidator {
    calls: Arc<AtomicUsize>,
    fail_at: usize,
}

impl stateless::NotificationValidator for CountingValidator {
    fn name(&self) -> &str {
        "CountingValidator"
    }

    fn validate(&self, _: &Notification<'_>) -> ValidationResult {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_at {
            ValidationResult::FAILURE
        } else {
            ValidationResult::SUCCESS
        }
    }
}

const VALIDATOR_TYPES: [NotificationType; 7] = [
    NotificationType::CoreEntity,
    NotificationType::CoreTransaction,
    NotificationType::CoreSignature,
    NotificationType::BalanceTransfer,
    NotificationType::TransferMessage,
    NotificationType::TransferMosaics,
    NotificationType::CoreBlock,
];

fn counting_adapter(calls: &Arc<AtomicUsize>, fail_at: usize) -> stateless::NotificationValidatorAdapter {
    let mut builder = stateless::AggregateNotificationValidator::builder();
    for notification_type in VALIDATOR_TYPES {
        builder = builder.add_boxed(
            notification_type,
            Box::new(CountingValidator {
                calls: Arc::clone(calls),
                fail_at,
            }),
        );
    }
    let publisher: Arc<dyn NotificationPublisher> =
        Arc::new(EntityNotificationPublisher::new(registry()));
    stateless::NotificationValidatorAdapter::new(Box::new(builder.build()), publisher)
}

#[test]
fn test_first_failure_stops_notification_walk() {
    use stateless::EntityValidator;

    let transaction = Account::new(1).transfer([3u8; 25], &[(1, 5), (2, 5)]);
    let entity = WeakEntityInfo::from_transaction(&transaction);

    // entity, transaction, signature, message, mosaics and two balance transfers
    let calls = Arc::new(AtomicUsize::new(0));
    assert_eq!(counting_adapter(&calls, 0).validate(&entity), ValidationResult::SUCCESS);
    assert_eq!(calls.load(Ordering::SeqCst), 7);

    for fail_at in 1..=7 {
        let calls = Arc::new(AtomicUsize::new(0));
        assert_eq!(
            counting_adapter(&calls, fail_at).validate(&entity),
            ValidationResult::FAILURE
        );
        assert_eq!(calls.load(Ordering::SeqCst), fail_at);
    }
}

struct ReplayGuard;

impl stateless::TypedValidator for ReplayGuard {
    type Notification = qc_validation::kind::CoreTransaction;

    fn name(&self) -> &'static str {
        "ReplayGuard"
    }

    fn validate(&self, _: &qc_validation::TransactionNotification<'_>) -> ValidationResult {
        ValidationResult::NEUTRAL
    }
}

#[test]
fn test_neutral_result_defers_block() {
    let alice = Account::new(1);
    let publisher: Arc<dyn NotificationPublisher> =
        Arc::new(EntityNotificationPublisher::new(registry()));

    let stateless = stateless::AggregateNotificationValidator::builder()
        .add(ReplayGuard)
        .build();
    let stateful = stateful::AggregateNotificationValidator::builder().build();
    let observers = AggregateNotificationObserver::builder().build();

    let pipeline = ValidationPipeline::new(
        NETWORK,
        Arc::new(stateless::NotificationValidatorAdapter::new(
            Box::new(stateless),
            publisher.clone(),
        )),
        Box::new(stateful::NotificationValidatorAdapter::new(
            Box::new(stateful),
            publisher.clone(),
        )),
        Box::new(NotificationObserverAdapter::new(Box::new(observers), publisher)),
    );
    let processor = EntityProcessor::new(pipeline, state(vec![alice.funded(1)])).unwrap();

    let block = Account::new(9).block(2, vec![alice.transfer([3u8; 25], &[(CURRENCY, 1)])]);
    assert_eq!(
        processor.process_block(&block).unwrap(),
        ProcessingOutcome::Deferred {
            entity: EntityPosition::Transaction(0),
            result: ValidationResult::NEUTRAL,
        }
    );
    assert_eq!(processor.state().height(), 0);
}

#[test]
fn test_batch_validation_matches_sequential() {
    use stateless::EntityValidator;

    let pipeline = ValidationPipeline::with_defaults(&ValidationConfig::default(), registry());
    let validator = pipeline.stateless();
    let batch = BatchValidator::new(Arc::clone(&validator));

    let alice = Account::new(1);
    let transactions: Vec<_> = (1..=64u64)
        .map(|i| {
            if i % 3 == 0 {
                alice.transfer([4u8; 25], &[(i + 1, 1), (i, 1)])
            } else {
                alice.transfer([4u8; 25], &[(i, 1), (i + 1, 1)])
            }
        })
        .collect();
    let entities: Vec<_> = transactions
        .iter()
        .map(WeakEntityInfo::from_transaction)
        .collect();

    let sequential: Vec<_> = entities.iter().map(|e| validator.validate(e)).collect();
    assert_eq!(batch.validate_all(&entities), sequential);
    for (i, result) in (1..=64u64).zip(&sequential) {
        let expected = if i % 3 == 0 {
            ValidationResult::FAILURE_TRANSFER_OUT_OF_ORDER_MOSAICS
        } else {
            ValidationResult::SUCCESS
        };
        assert_eq!(*result, expected, "transaction {i}");
    }
}
