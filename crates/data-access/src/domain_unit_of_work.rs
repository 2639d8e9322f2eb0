use std::any::{Any, TypeId};
use std::sync::{Arc, Mutex, PoisonError};

use event_source::{AggregateRoot, Version};

use crate::error::Result;
use crate::mapper::{AggregateMapper, Mapper};
use crate::unit_of_work::UnitOfWork;

/// A unit of work enforcing the optimistic-concurrency discipline over a
/// domain model.
///
/// Command batches touch the same aggregate repeatedly, so the stored version
/// of a given (aggregate type, key) pair only needs to be asserted once per
/// session: the first [`get`](Self::get) performs the version-checked load,
/// and every later read of that pair is an unconditional load. The assertion
/// set lives for as long as the session and is shared by every handle created
/// with [`attach`](Self::attach).
pub struct DomainUnitOfWork<M: Mapper> {
    session: UnitOfWork<M>,
    assertions: Arc<Mutex<AssertionSet>>,
}

#[derive(Default)]
struct AssertionSet {
    entries: Vec<AssertedKey>,
}

/// One (aggregate type, key) pair whose version has been asserted. Matching
/// is on aggregate type identity plus key equality.
struct AssertedKey {
    type_id: TypeId,
    key: Box<dyn Any + Send + Sync>,
}

impl AssertionSet {
    fn contains<A: AggregateRoot>(&self, key: &A::Key) -> bool {
        self.entries.iter().any(|entry| {
            entry.type_id == TypeId::of::<A>()
                && entry
                    .key
                    .downcast_ref::<A::Key>()
                    .is_some_and(|asserted| asserted == key)
        })
    }

    fn insert<A: AggregateRoot>(&mut self, key: &A::Key) {
        self.entries.push(AssertedKey {
            type_id: TypeId::of::<A>(),
            key: Box::new(key.clone()),
        });
    }
}

impl<M: Mapper> DomainUnitOfWork<M> {
    /// Opens a new session owning `mapper`, with an empty assertion set.
    pub fn new(mapper: M) -> Self {
        Self {
            session: UnitOfWork::new(mapper),
            assertions: Arc::new(Mutex::new(AssertionSet::default())),
        }
    }

    /// Opens a session over a mapper owned elsewhere. See
    /// [`UnitOfWork::shared`].
    pub fn shared(mapper: M) -> Self {
        Self {
            session: UnitOfWork::shared(mapper),
            assertions: Arc::new(Mutex::new(AssertionSet::default())),
        }
    }

    /// Hands out another handle onto this session. Attached handles share
    /// the reference count and the assertion set.
    pub fn attach(&self) -> Self {
        Self {
            session: self.session.attach(),
            assertions: Arc::clone(&self.assertions),
        }
    }

    /// Loads an aggregate, asserting its stored version at most once per
    /// session.
    ///
    /// The first call for a given (type, key) pair marks the pair as
    /// asserted and performs a version-checked load, failing with
    /// [`ConcurrencyConflict`] when the stored version differs from
    /// `expected_version`. Every later call for that pair loads
    /// unconditionally, whatever version it asks for: the caller validated
    /// the version earlier in the same logical transaction, and its
    /// in-memory copy stays authoritative for the rest of it.
    ///
    /// [`ConcurrencyConflict`]: crate::MapperError::ConcurrencyConflict
    pub async fn get<A>(&self, key: &A::Key, expected_version: Version) -> Result<A>
    where
        A: AggregateRoot,
        M: AggregateMapper<A>,
    {
        let first_assertion = {
            let mut assertions = self.assertions();
            if assertions.contains::<A>(key) {
                false
            } else {
                assertions.insert::<A>(key);
                true
            }
        };

        if first_assertion {
            self.session.mapper().get(key, Some(expected_version)).await
        } else {
            tracing::trace!(
                session = self.session.id(),
                kind = A::KIND,
                "version already asserted, loading unconditionally"
            );
            self.session.mapper().get(key, None).await
        }
    }

    /// Loads an aggregate unconditionally. Does not consult or extend the
    /// assertion set.
    pub async fn get_unchecked<A>(&self, key: &A::Key) -> Result<A>
    where
        A: AggregateRoot,
        M: AggregateMapper<A>,
    {
        self.session.mapper().get(key, None).await
    }

    /// Whether a committed aggregate exists for `key`. Not affected by
    /// assertion memoization.
    pub async fn exists<A>(&self, key: &A::Key) -> Result<bool>
    where
        A: AggregateRoot,
        M: AggregateMapper<A>,
    {
        self.session.mapper().exists(key).await
    }

    /// Registers a new aggregate for eventual commit. Re-registering the
    /// same stream refreshes the registration rather than erroring.
    pub async fn add<A>(&self, aggregate: &A) -> Result<()>
    where
        A: AggregateRoot,
        M: AggregateMapper<A>,
    {
        self.session.mapper().add(aggregate).await
    }

    /// Drops the pending registration for one aggregate.
    pub async fn evict<A>(&self, key: &A::Key)
    where
        A: AggregateRoot,
        M: AggregateMapper<A>,
    {
        self.session.evict::<A>(key).await;
    }

    /// Drops every pending registration.
    pub async fn evict_all(&self) {
        self.session.evict_all().await;
    }

    /// Writes registered changes to the store. Failures propagate unchanged.
    pub async fn submit_changes(&self) -> Result<()> {
        self.session.submit_changes().await
    }

    /// Rebinds the session onto a mapper owned elsewhere. See
    /// [`UnitOfWork::connect_to_shared_mapper`].
    pub fn connect_to_shared_mapper(&self, mapper: M) {
        self.session.connect_to_shared_mapper(mapper);
    }

    /// A handle onto the currently bound mapper.
    pub fn mapper(&self) -> M {
        self.session.mapper()
    }

    /// The underlying session handle, for lifecycle concerns such as
    /// [`UnitOfWork::on_disposing`].
    pub fn unit_of_work(&self) -> &UnitOfWork<M> {
        &self.session
    }

    /// Session id shared by every attached handle.
    pub fn id(&self) -> u64 {
        self.session.id()
    }

    fn assertions(&self) -> std::sync::MutexGuard<'_, AssertionSet> {
        self.assertions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
