//! Todo-list domain model.
//!
//! # Responsibility
//! - Define the two entity kinds (`TodoList`, `Todo`) shared by every backend.
//! - Provide leaf utilities the ephemeral backend builds on: identifier
//!   generation, copy-on-read isolation and default seed data.
//!
//! # Invariants
//! - Every entity carries its owner's username.
//! - A `Todo` belongs to exactly one `TodoList` for its whole lifetime.

pub mod id;
pub mod isolation;
pub mod seed;
pub mod todo;
pub mod user;
