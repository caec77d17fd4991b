//! salesdash - sales analytics REST API
//!
//! Serves aggregate analytics over a single `sales` table and replaces the
//! table's contents from a remote CSV feed on demand.

pub mod analytics;
pub mod api;
pub mod config;
pub mod interfaces;
pub mod loader;
pub mod model;
pub mod storage;
pub mod utils;
