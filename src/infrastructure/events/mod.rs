//! Event delivery - In-process fan-out of committed domain events

mod event_bus;

pub use event_bus::{ChannelSubscriber, InProcessEventBus};
