//! Application layer - command services, queries, sweeps, and handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Writes go through the `UnitOfWork` transactional scope; reads return
//! entity reference snapshots; event handlers react on the asynchronous
//! channel.

pub mod handlers;

mod listing;
mod maintenance;
mod queries;
mod reservation;
mod unit_of_work;

pub use listing::ListingCommands;
pub use maintenance::{Maintenance, DEFAULT_PURGE_AFTER_DAYS};
pub use queries::{ListingQueries, ReservationQueries};
pub use reservation::ReservationCommands;
pub use unit_of_work::UnitOfWork;
