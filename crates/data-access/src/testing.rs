//! Minimal aggregates used by the unit tests in this crate.

use event_source::{AggregateRoot, AggregateState, DomainEvent, EventSource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum NoteEvent {
    Created { title: String },
    Retitled { title: String },
}

impl DomainEvent for NoteEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Created { .. } => "note.created",
            Self::Retitled { .. } => "note.retitled",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteState {
    pub title: Option<String>,
}

impl AggregateState for NoteState {
    type Event = NoteEvent;

    fn when(&mut self, event: &Self::Event) {
        match event {
            NoteEvent::Created { title } | NoteEvent::Retitled { title } => {
                self.title = Some(title.clone());
            }
        }
    }
}

pub struct Note {
    source: EventSource<Note>,
}

impl Note {
    pub fn create(key: &str, title: &str) -> Self {
        let mut note = Self::with_key(key.to_string());
        note.source.apply(NoteEvent::Created {
            title: title.to_string(),
        });
        note
    }

    pub fn retitle(&mut self, title: &str) {
        self.source.apply(NoteEvent::Retitled {
            title: title.to_string(),
        });
    }

    pub fn title(&self) -> Option<&str> {
        self.source.state().title.as_deref()
    }
}

impl AggregateRoot for Note {
    const KIND: &'static str = "Note";
    type Key = String;
    type Event = NoteEvent;
    type State = NoteState;

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

/// Second aggregate kind sharing the note events, for type-scoping tests.
pub struct Memo {
    source: EventSource<Memo>,
}

impl Memo {
    pub fn create(key: &str, title: &str) -> Self {
        let mut memo = Self::with_key(key.to_string());
        memo.source.apply(NoteEvent::Created {
            title: title.to_string(),
        });
        memo
    }
}

impl AggregateRoot for Memo {
    const KIND: &'static str = "Memo";
    type Key = String;
    type Event = NoteEvent;
    type State = NoteState;

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
