//! Pure validation domain: result codes, notifications, entity handles and
//! configuration.

pub mod config;
pub mod entity_info;
pub mod errors;
pub mod notifications;
pub mod result;

pub use config::*;
pub use entity_info::*;
pub use errors::*;
pub use notifications::*;
pub use result::*;
