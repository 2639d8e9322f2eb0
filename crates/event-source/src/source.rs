use std::fmt;
use std::sync::OnceLock;

use common::{FunctionalKey, stream_id_for};
use uuid::Uuid;

use crate::event::{DomainEvent, RecordedEvent};
use crate::sink::EventSink;
use crate::state::AggregateState;
use crate::version::Version;

/// An aggregate root whose state is derived from a replayable event stream.
///
/// Implementers own an [`EventSource`] and expose domain command methods that
/// validate input and then record events through it. Version bookkeeping,
/// replay, pending-change tracking, and stream identity are provided here.
pub trait AggregateRoot: Send + Sync + Sized + 'static {
    /// Stable aggregate kind. Feeds derived stream ids and trace output, so
    /// it must never change once streams exist.
    const KIND: &'static str;

    /// Functional key addressing one instance of this aggregate.
    type Key: FunctionalKey;

    /// Event enum recorded by this aggregate.
    type Event: DomainEvent;

    /// State rebuilt by folding events.
    type State: AggregateState<Event = Self::Event>;

    /// Constructs an empty aggregate addressed by `key`. No events are
    /// recorded; the state starts at its default.
    fn with_key(key: Self::Key) -> Self;

    fn source(&self) -> &EventSource<Self>;

    fn source_mut(&mut self) -> &mut EventSource<Self>;

    fn key(&self) -> &Self::Key {
        self.source().key()
    }

    /// Committed version plus the number of pending changes.
    fn version(&self) -> Version {
        self.source().version()
    }

    fn committed_version(&self) -> Version {
        self.source().committed_version()
    }

    /// Stream id derived from the functional key.
    fn stream_id(&self) -> Uuid {
        self.source().stream_id()
    }

    /// Events recorded since construction or the last commit, oldest first.
    fn changes(&self) -> &[RecordedEvent<Self::Event>] {
        self.source().changes()
    }

    /// Rebuilds the aggregate from history. See [`EventSource::load`].
    fn load(&mut self, committed_version: Version, events: impl IntoIterator<Item = Self::Event>) {
        self.source_mut().load(committed_version, events);
    }

    /// Acknowledges a successful write. See [`EventSource::mark_as_committed`].
    fn mark_as_committed(&mut self, committed_version: Version) {
        self.source_mut().mark_as_committed(committed_version);
    }
}

/// Event-sourced core owned by each aggregate root.
///
/// Tracks the functional key, the replay-built state, the events recorded
/// since the last commit, and the committed version. The aggregate's version
/// is always the committed version plus the number of pending changes.
pub struct EventSource<A: AggregateRoot> {
    key: A::Key,
    state: A::State,
    changes: Vec<RecordedEvent<A::Event>>,
    committed_version: Version,
    stream_id: OnceLock<Uuid>,
    sink: EventSink<A::Event>,
}

impl<A: AggregateRoot> EventSource<A> {
    pub fn new(key: A::Key) -> Self {
        Self {
            key,
            state: A::State::default(),
            changes: Vec::new(),
            committed_version: Version::initial(),
            stream_id: OnceLock::new(),
            sink: EventSink::new(),
        }
    }

    pub fn key(&self) -> &A::Key {
        &self.key
    }

    pub fn state(&self) -> &A::State {
        &self.state
    }

    pub fn version(&self) -> Version {
        Version::new(self.committed_version.as_i64() + self.changes.len() as i64)
    }

    pub fn committed_version(&self) -> Version {
        self.committed_version
    }

    /// Stream id derived from the functional key, computed on first use and
    /// cached. The key is immutable, so the id never changes.
    pub fn stream_id(&self) -> Uuid {
        *self
            .stream_id
            .get_or_init(|| stream_id_for(A::KIND, &self.key))
    }

    /// Records a new event.
    ///
    /// The event is stored at the version the aggregate reaches with it
    /// included: the first event of a fresh aggregate carries version 1. The
    /// state folds the event, observers are notified in subscription order,
    /// and the pending-change list grows by one.
    pub fn apply(&mut self, event: A::Event) {
        let recorded = RecordedEvent::new(self.version().next(), event);
        self.state.process(recorded.event());
        self.sink.raise(&recorded);
        self.changes.push(recorded);
    }

    /// Rebuilds state from history.
    ///
    /// Pending changes are discarded, the state is reset and each event is
    /// folded through [`AggregateState::process`], then the committed version
    /// is set. Replay never appends to the pending list and never raises
    /// observer notifications.
    pub fn load(&mut self, committed_version: Version, events: impl IntoIterator<Item = A::Event>) {
        self.changes.clear();
        self.state = A::State::default();
        for event in events {
            self.state.process(&event);
        }
        self.committed_version = committed_version;
    }

    /// Events recorded since construction or the last commit, oldest first.
    /// Callers must treat the slice as a read-only snapshot.
    pub fn changes(&self) -> &[RecordedEvent<A::Event>] {
        &self.changes
    }

    /// Clears pending changes and advances the committed version. Called by
    /// the persistence boundary after a successful write.
    pub fn mark_as_committed(&mut self, committed_version: Version) {
        self.changes.clear();
        self.committed_version = committed_version;
    }

    /// Registers an observer for newly recorded events.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&RecordedEvent<A::Event>) + Send + Sync + 'static,
    ) {
        self.sink.subscribe(observer);
    }

    pub fn sink(&self) -> &EventSink<A::Event> {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut EventSink<A::Event> {
        &mut self.sink
    }
}

impl<A: AggregateRoot> fmt::Debug for EventSource<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("kind", &A::KIND)
            .field("key", &self.key)
            .field("version", &self.version())
            .field("committed_version", &self.committed_version)
            .field("pending", &self.changes.len())
            .finish()
    }
}
