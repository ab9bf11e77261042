pub mod paths;
pub mod token_store;

pub use paths::*;
pub use token_store::*;
