use crate::event::DomainEvent;

/// Replay-only state owned by exactly one aggregate root.
///
/// State is a bag of derived fields with no identity of its own. It mutates
/// only inside [`when`], which matches exhaustively over the aggregate's
/// event enum, so every variant has exactly one handler and a missing handler
/// is a compile error. External callers never mutate state directly.
///
/// [`when`]: AggregateState::when
pub trait AggregateState: Default + Send + Sync {
    /// Event enum this state folds.
    type Event: DomainEvent;

    /// Folds one event into the state.
    fn when(&mut self, event: &Self::Event);

    /// Dispatch entry point used by the event source for new events and for
    /// replay. Obsolete variants are absorbed without mutation so historical
    /// streams still load.
    fn process(&mut self, event: &Self::Event) {
        if event.is_obsolete() {
            return;
        }
        self.when(event);
    }
}
