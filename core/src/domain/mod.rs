//! Domain layer: entities and value objects

pub mod entities;

pub use entities::token::{Claims, ClientMeta, RefreshTokenRecord, TokenPair};
pub use entities::user::UserAccount;
