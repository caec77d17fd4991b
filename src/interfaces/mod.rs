//! Abstract interfaces for salesdash components.
//!
//! These traits define the contracts for:
//! - Sales record storage (bulk replace, aggregate queries, diagnostics)

pub mod sales_store;

pub use sales_store::{SalesStore, StoreError};
