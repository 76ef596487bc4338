// moonward-api: Async Rust client for the Moon parental-controls API

pub mod auth;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod types;

pub use auth::{AuthHandle, StaticTokenProvider, TokenProvider};
pub use client::{ApiClient, ApiResponse};
pub use endpoint::{BASE_URL, Endpoint};
pub use error::Error;
