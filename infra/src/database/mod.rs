//! Database layer

pub mod connection;
pub mod mysql;
