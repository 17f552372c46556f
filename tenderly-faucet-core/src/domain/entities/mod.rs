//! Domain entities and value objects

pub mod endpoint;
pub mod token;

pub use endpoint::*;
pub use token::*;
