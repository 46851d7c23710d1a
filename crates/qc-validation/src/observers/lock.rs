use crate::domain::{kind, HashLockNotification, ObserverError, SecretLockNotification};
use crate::observers::{ObserverContext, TypedObserver};
use qc_04_state_management::{LockInfo, LockInfoCache, LockKind, LockStatus};
use shared_types::LockHashAlgorithm;

/// Records a hash lock expiring `duration` blocks after inclusion.
pub struct HashLockObserver;

impl TypedObserver for HashLockObserver {
    type Notification = kind::HashLock;

    fn name(&self) -> &'static str {
        "HashLockObserver"
    }

    fn notify(
        &self,
        notification: &HashLockNotification<'_>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        let lock = LockInfo {
            sender: *notification.signer,
            mosaic: notification.mosaic,
            end_height: context.height.saturating_add(notification.duration),
            status: LockStatus::Unused,
            kind: LockKind::Hash {
                hash: *notification.hash,
            },
        };
        context.cache.sub_mut::<LockInfoCache>().insert(lock)?;
        Ok(())
    }
}

pub struct SecretLockObserver;

impl TypedObserver for SecretLockObserver {
    type Notification = kind::SecretLock;

    fn name(&self) -> &'static str {
        "SecretLockObserver"
    }

    fn notify(
        &self,
        notification: &SecretLockNotification<'_>,
        context: &mut ObserverContext<'_>,
    ) -> Result<(), ObserverError> {
        let lock = LockInfo {
            sender: *notification.signer,
            mosaic: notification.mosaic,
            end_height: context.height.saturating_add(notification.duration),
            status: LockStatus::Unused,
            kind: LockKind::Secret {
                algorithm: LockHashAlgorithm::try_from(notification.hash_algorithm)?,
                secret: *notification.secret,
                recipient: *notification.recipient,
            },
        };
        context.cache.sub_mut::<LockInfoCache>().insert(lock)?;
        Ok(())
    }
}
