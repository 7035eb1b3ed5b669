//! Session-scoped identifier source.
//!
//! # Invariants
//! - Values handed out by one generator are strictly increasing.
//! - Generators are owned by a store/session, never shared process-wide, so
//!   identifier values carry no meaning across sessions.

/// Monotonic numeric identifier generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGenerator {
    next: i64,
}

impl IdGenerator {
    /// Starts a generator whose first identifier is `1`.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: i64) -> Self {
        Self { next: first }
    }

    /// Returns a fresh identifier.
    pub fn next_id(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
