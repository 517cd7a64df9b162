pub mod client;
pub mod auth;
pub mod role;
pub mod user;
pub mod supplier;

pub use client::{ensure_success, ApiClient, RequestOptions};
