//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Persistence: In-memory unit of work
//! - Events: In-process event bus
//! - Console: JSON-lines request adapter
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod console;
pub mod events;
pub mod persistence;
pub mod seed;
pub mod state;
