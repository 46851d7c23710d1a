use crate::domain::{
    kind, TransferMessageNotification, TransferMosaicsNotification, ValidationResult,
};
use crate::validators::stateless;

pub struct TransferMessageValidator {
    max_message_size: usize,
}

impl TransferMessageValidator {
    pub fn new(max_message_size: usize) -> Self {
        Self { max_message_size }
    }
}

impl stateless::TypedValidator for TransferMessageValidator {
    type Notification = kind::TransferMessage;

    fn name(&self) -> &'static str {
        "TransferMessageValidator"
    }

    fn validate(&self, notification: &TransferMessageNotification) -> ValidationResult {
        if notification.message_size > self.max_message_size {
            ValidationResult::FAILURE_TRANSFER_MESSAGE_TOO_LARGE
        } else {
            ValidationResult::SUCCESS
        }
    }
}

/// Mosaic ids must be strictly ascending (no duplicates) and within the
/// per-transfer limit.
pub struct TransferMosaicsValidator {
    max_mosaics: usize,
}

impl TransferMosaicsValidator {
    pub fn new(max_mosaics: usize) -> Self {
        Self { max_mosaics }
    }
}

impl stateless::TypedValidator for TransferMosaicsValidator {
    type Notification = kind::TransferMosaics;

    fn name(&self) -> &'static str {
        "TransferMosaicsValidator"
    }

    fn validate(&self, notification: &TransferMosaicsNotification<'_>) -> ValidationResult {
        let mosaics = notification.mosaics;
        if mosaics.len() > self.max_mosaics {
            return ValidationResult::FAILURE_TRANSFER_TOO_MANY_MOSAICS;
        }

        if mosaics.windows(2).any(|pair| pair[0].id >= pair[1].id) {
            return ValidationResult::FAILURE_TRANSFER_OUT_OF_ORDER_MOSAICS;
        }

        ValidationResult::SUCCESS
    }
}
