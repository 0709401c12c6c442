//! Application layer - Use cases driven through the request pipeline
//!
//! Commands and queries are dispatched by the mediator to their handlers,
//! which talk to the outside world only through the outbound ports.

pub mod commands;
pub mod dto;
pub mod error;
pub mod event_handlers;
pub mod handlers;
pub mod pipeline;
pub mod ports;
pub mod queries;
pub mod services;
