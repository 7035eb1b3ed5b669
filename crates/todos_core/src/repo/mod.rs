//! Persistence contract and its two backends.
//!
//! # Responsibility
//! - Define the single contract request handlers depend on.
//! - Keep SQL details and in-memory bookkeeping behind that contract.
//!
//! # Invariants
//! - Both backends return identical results for identical operation
//!   sequences, modulo identifier values.

pub mod backend;
pub mod contract;
pub mod session_repo;
pub mod sqlite_repo;
