//! DevPilot Engine - Task and project tracking core
//!
//! Todos, projects and comments are driven through a command/query pipeline
//! (validation, then logging, then the handler), persisted through a unit of
//! work, and announce their changes as domain events once committed.

pub mod application;
pub mod domain;
pub mod infrastructure;
