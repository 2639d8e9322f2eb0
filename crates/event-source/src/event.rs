use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::version::Version;

/// A domain event that can be recorded against an aggregate.
///
/// Implemented on the tagged event enum of each aggregate, with one variant
/// per thing that can happen. Variants never change meaning once streams
/// exist; retired variants are flagged through [`is_obsolete`] instead of
/// being removed.
///
/// [`is_obsolete`]: DomainEvent::is_obsolete
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Stable name of this event variant, used in logs and stored metadata.
    fn event_type(&self) -> &'static str;

    /// Flags retired variants that still appear in historical streams.
    ///
    /// Obsolete events are absorbed during replay without touching state, so
    /// old streams keep loading after the variant's handler logic is gone.
    fn is_obsolete(&self) -> bool {
        false
    }
}

/// An event together with the aggregate version at which it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent<E> {
    version: Version,
    event: E,
}

impl<E> RecordedEvent<E> {
    /// Pairs an event with the version it was recorded at.
    pub fn new(version: Version, event: E) -> Self {
        Self { version, event }
    }

    /// Version the aggregate reached with this event included.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The event payload.
    pub fn event(&self) -> &E {
        &self.event
    }

    /// Consumes the record, returning the payload.
    pub fn into_event(self) -> E {
        self.event
    }
}
