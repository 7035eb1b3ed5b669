//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate contract calls into use-case level APIs.
//! - Keep request handlers decoupled from backend details.

pub mod todo_service;
