//! Core types and logic for the Aula planning/evaluation service.
//!
//! This crate is deliberately free of HTTP and file-format dependencies.
//! It holds the planning-table domain model, the enrichment and NRC
//! assignment rules, the cascade queries over an immutable snapshot, and the
//! [`store::PlanningStore`] trait implemented by storage backends.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod enrich;
pub mod error;
pub mod nrc;
pub mod record;
pub mod results;
pub mod snapshot;
pub mod store;
pub mod table;

pub use error::{Error, Result};
