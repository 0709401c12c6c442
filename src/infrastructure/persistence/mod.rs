//! Persistence adapters
//!
//! The in-memory store implements the unit of work port for the binary and
//! for integration tests.

mod memory_store;

pub use memory_store::InMemoryDatabase;
