pub mod sub_cache;

pub use sub_cache::*;
