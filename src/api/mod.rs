//! HTTP API.

pub mod cors;
pub mod response;
pub mod rest;

pub use rest::{router, serve, AppState};
