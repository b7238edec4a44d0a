//! Domain entities

pub mod token;
pub mod user;
