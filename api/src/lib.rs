//! # Inkwell API
//!
//! HTTP layer for the Inkwell backend: authentication routes, JWT
//! middleware, DTOs, and the application factory.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
