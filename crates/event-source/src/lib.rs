//! Event-sourced aggregate core.
//!
//! An aggregate's state is derived exclusively from an ordered sequence of
//! immutable events. Each aggregate root owns an [`EventSource`] that tracks
//! the functional key, the replay-built state, the events recorded since the
//! last commit, and the committed version. Domain code records new events
//! through command methods; persistence code replays history with
//! [`EventSource::load`] and acknowledges writes with
//! [`EventSource::mark_as_committed`].

pub mod event;
pub mod sink;
pub mod source;
pub mod state;
pub mod version;

pub use event::{DomainEvent, RecordedEvent};
pub use sink::EventSink;
pub use source::{AggregateRoot, EventSource};
pub use state::AggregateState;
pub use version::Version;

#[cfg(test)]
pub(crate) mod testing;
