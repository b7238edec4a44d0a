//! Request and response DTOs

pub mod auth_dto;

pub use auth_dto::{AuthResponse, LoginRequest, LogoutResponse, RefreshTokenRequest};
