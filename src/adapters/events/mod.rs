//! Event bus adapter.
//!
//! `DomainEventBus` implements both event ports: inline dispatch for
//! the synchronous channel and a bounded queue with a dispatcher task
//! for the asynchronous one.

mod bus;

pub use bus::{DomainEventBus, EventBusConfig};
