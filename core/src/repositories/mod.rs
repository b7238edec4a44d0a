//! Repository interfaces and test doubles

pub mod token;
pub mod user;

pub use token::{MockTokenRepository, TokenRepository};
pub use user::{MockUserDirectory, UserDirectory};
