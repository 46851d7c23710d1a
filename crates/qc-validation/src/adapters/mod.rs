pub mod publisher;

pub use publisher::{EntityNotificationPublisher, TransactionRegistry};
