//! Token issuance, hashing, and maintenance

pub mod hashing;
mod issuer;
mod reaper;

pub use issuer::TokenIssuer;
pub use reaper::ExpiredTokenReaper;
