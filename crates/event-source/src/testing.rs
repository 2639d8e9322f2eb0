//! Minimal aggregate used by the unit tests in this crate.

use serde::{Deserialize, Serialize};

use crate::event::DomainEvent;
use crate::source::{AggregateRoot, EventSource};
use crate::state::AggregateState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CounterEvent {
    Started { name: String },
    Incremented { by: i64 },
    /// Retired variant still present in old streams.
    Audited,
}

impl DomainEvent for CounterEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Started { .. } => "counter.started",
            Self::Incremented { .. } => "counter.incremented",
            Self::Audited => "counter.audited",
        }
    }

    fn is_obsolete(&self) -> bool {
        matches!(self, Self::Audited)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterState {
    pub name: Option<String>,
    pub total: i64,
}

impl AggregateState for CounterState {
    type Event = CounterEvent;

    fn when(&mut self, event: &Self::Event) {
        match event {
            CounterEvent::Started { name } => self.name = Some(name.clone()),
            CounterEvent::Incremented { by } => self.total += by,
            CounterEvent::Audited => {}
        }
    }
}

pub struct Counter {
    source: EventSource<Counter>,
}

impl Counter {
    pub fn start(key: String, name: &str) -> Self {
        let mut counter = Self::with_key(key);
        counter.source.apply(CounterEvent::Started {
            name: name.to_string(),
        });
        counter
    }

    pub fn increment(&mut self, by: i64) {
        self.source.apply(CounterEvent::Incremented { by });
    }

    pub fn total(&self) -> i64 {
        self.source.state().total
    }
}

impl AggregateRoot for Counter {
    const KIND: &'static str = "Counter";
    type Key = String;
    type Event = CounterEvent;
    type State = CounterState;

    fn with_key(key: Self::Key) -> Self {
        Self {
            source: EventSource::new(key),
        }
    }

    fn source(&self) -> &EventSource<Self> {
        &self.source
    }

    fn source_mut(&mut self) -> &mut EventSource<Self> {
        &mut self.source
    }
}

/// Second aggregate kind sharing the counter events, for identity tests.
pub struct Tally {
    source: EventSource<Tally>,
}

impl AggregateRoot for Tally {
    const KIND: &'static str = "Tally";
    type Key = String;
    type Event = CounterEvent;
    type State = CounterState;

    fn with_key(key: Self::Key) -> Self {
        Self {
            source: EventSource::new(key),
        }
    }

    fn source(&self) -> &EventSource<Self> {
        &self.source
    }

    fn source_mut(&mut self) -> &mut EventSource<Self> {
        &mut self.source
    }
}
