pub mod cache;
pub mod delta_set;
pub mod entities;
pub mod errors;

pub use cache::*;
pub use delta_set::*;
pub use entities::*;
pub use errors::*;
