//! Event handlers reacting to domain events on the asynchronous channel.
//!
//! Each handler owns one reaction and stays independent of the others:
//! the index synchronizer projects listings into the search index, the
//! notifier composes user-facing messages, and the history recorder folds
//! closed reservations back into their listing. Registration against the
//! event bus happens at wiring time through each handler's
//! `event_types()` list.

mod listing_index_synchronizer;
mod reservation_notifier;
mod sharing_history_recorder;

pub use listing_index_synchronizer::ListingIndexSynchronizer;
pub use reservation_notifier::ReservationNotifier;
pub use sharing_history_recorder::SharingHistoryRecorder;
