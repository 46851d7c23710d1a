pub mod account_cache;
pub mod lock_cache;
pub mod plugin_adapter;

pub use account_cache::*;
pub use lock_cache::*;
pub use plugin_adapter::*;
