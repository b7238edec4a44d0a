//! Refresh token repository interface and mock implementation

mod mock;
mod r#trait;

pub use mock::MockTokenRepository;
pub use r#trait::TokenRepository;
