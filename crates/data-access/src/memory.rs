use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use common::stream_id_for;
use event_source::{AggregateRoot, Version};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{MapperError, Result};
use crate::mapper::{AggregateMapper, Mapper};

type StreamKey = (TypeId, Uuid);
type StreamMap = HashMap<StreamKey, StreamSlot>;

/// One committed stream: its version plus the typed event list behind `Any`.
struct StreamSlot {
    committed_version: Version,
    payload: Box<dyn Any + Send + Sync>,
}

/// Typed payload held by a [`StreamSlot`] keyed under `TypeId::of::<A>()`.
struct StoredStream<A: AggregateRoot> {
    key: A::Key,
    events: Vec<A::Event>,
}

/// A registration made by `add`, applied to the committed map on submit.
struct PendingInsert {
    type_id: TypeId,
    stream_id: Uuid,
    commit: Box<dyn FnOnce(&mut StreamMap) + Send + Sync>,
}

/// In-memory mapper used by tests and examples.
///
/// Committed streams play the role of the store. `add` stages a snapshot of
/// an aggregate's pending events; `submit_changes` applies every staged
/// registration, creating new streams and extending existing ones. Reads
/// replay a fresh aggregate from the committed events, so callers always get
/// a detached instance.
///
/// Cloning yields another handle onto the same store, which is how one
/// mapper is shared between a session and the test asserting on it.
#[derive(Clone, Default)]
pub struct InMemoryDataMapper {
    streams: Arc<RwLock<StreamMap>>,
    pending: Arc<RwLock<Vec<PendingInsert>>>,
    submitted: Arc<AtomicBool>,
    disposed: Arc<AtomicBool>,
}

impl InMemoryDataMapper {
    /// Creates a new empty mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a committed stream from `aggregate`'s recorded events, as if it
    /// had been added and submitted earlier.
    pub async fn seed<A: AggregateRoot>(&self, aggregate: &A) {
        let mut streams = self.streams.write().await;
        streams.insert(
            (TypeId::of::<A>(), aggregate.stream_id()),
            StreamSlot {
                committed_version: aggregate.version(),
                payload: Box::new(StoredStream::<A> {
                    key: aggregate.key().clone(),
                    events: recorded_payloads(aggregate),
                }),
            },
        );
    }

    /// Rebuilds every committed aggregate of type `A`.
    pub async fn committed<A: AggregateRoot>(&self) -> Vec<A> {
        let streams = self.streams.read().await;
        streams
            .iter()
            .filter(|((type_id, _), _)| *type_id == TypeId::of::<A>())
            .filter_map(|(_, slot)| {
                let stored = slot.payload.downcast_ref::<StoredStream<A>>()?;
                let mut aggregate = A::with_key(stored.key.clone());
                aggregate.load(slot.committed_version, stored.events.iter().cloned());
                Some(aggregate)
            })
            .collect()
    }

    /// Whether any registration is still waiting for a submit.
    pub async fn has_changes(&self) -> bool {
        !self.pending.read().await.is_empty()
    }

    /// Whether `submit_changes` has run at least once.
    pub fn submitted(&self) -> bool {
        self.submitted.load(Ordering::SeqCst)
    }

    /// Whether the owning session has released its store resources.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

fn recorded_payloads<A: AggregateRoot>(aggregate: &A) -> Vec<A::Event> {
    aggregate
        .changes()
        .iter()
        .map(|recorded| recorded.event().clone())
        .collect()
}

fn stream_key<A: AggregateRoot>(key: &A::Key) -> StreamKey {
    (TypeId::of::<A>(), stream_id_for(A::KIND, key))
}

#[async_trait]
impl Mapper for InMemoryDataMapper {
    async fn submit_changes(&self) -> Result<()> {
        let staged: Vec<PendingInsert> = self.pending.write().await.drain(..).collect();
        let mut streams = self.streams.write().await;
        for entry in staged {
            (entry.commit)(&mut streams);
        }
        self.submitted.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn evict_all(&self) {
        self.pending.write().await.clear();
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl<A: AggregateRoot> AggregateMapper<A> for InMemoryDataMapper {
    async fn get(&self, key: &A::Key, expected_version: Option<Version>) -> Result<A> {
        let (type_id, stream_id) = stream_key::<A>(key);
        let streams = self.streams.read().await;

        // A missing stream is NotFound even when a version was expected.
        let slot = streams.get(&(type_id, stream_id)).ok_or(MapperError::NotFound {
            kind: A::KIND,
            stream_id,
        })?;

        if let Some(expected) = expected_version
            && slot.committed_version != expected
        {
            return Err(MapperError::ConcurrencyConflict {
                kind: A::KIND,
                stream_id,
                expected,
                actual: slot.committed_version,
            });
        }

        let stored = slot
            .payload
            .downcast_ref::<StoredStream<A>>()
            .ok_or_else(|| {
                MapperError::Backend(format!("stream {stream_id} holds foreign events"))
            })?;

        let mut aggregate = A::with_key(key.clone());
        aggregate.load(slot.committed_version, stored.events.iter().cloned());
        Ok(aggregate)
    }

    async fn exists(&self, key: &A::Key) -> Result<bool> {
        let streams = self.streams.read().await;
        Ok(streams.contains_key(&stream_key::<A>(key)))
    }

    async fn add(&self, aggregate: &A) -> Result<()> {
        let type_id = TypeId::of::<A>();
        let stream_id = aggregate.stream_id();
        let key = aggregate.key().clone();
        let events = recorded_payloads(aggregate);
        let target_version = aggregate.version();

        let commit: Box<dyn FnOnce(&mut StreamMap) + Send + Sync> =
            Box::new(move |streams: &mut StreamMap| {
                let slot = streams
                    .entry((type_id, stream_id))
                    .or_insert_with(|| StreamSlot {
                        committed_version: Version::initial(),
                        payload: Box::new(StoredStream::<A> {
                            key,
                            events: Vec::new(),
                        }),
                    });
                if let Some(stored) = slot.payload.downcast_mut::<StoredStream<A>>() {
                    stored.events.extend(events);
                    slot.committed_version = target_version;
                }
            });

        let mut pending = self.pending.write().await;
        if let Some(existing) = pending
            .iter_mut()
            .find(|entry| entry.type_id == type_id && entry.stream_id == stream_id)
        {
            // Same stream staged again: refresh the snapshot.
            existing.commit = commit;
        } else {
            pending.push(PendingInsert {
                type_id,
                stream_id,
                commit,
            });
        }
        Ok(())
    }

    async fn evict(&self, key: &A::Key) {
        let (type_id, stream_id) = stream_key::<A>(key);
        self.pending
            .write()
            .await
            .retain(|entry| !(entry.type_id == type_id && entry.stream_id == stream_id));
    }
}
