use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use event_source::AggregateRoot;

use crate::error::Result;
use crate::mapper::{AggregateMapper, Mapper};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// A handle onto a reference-counted session wrapping one mapper.
///
/// Creating a unit of work opens a session with one reference;
/// [`attach`](Self::attach) hands out further handles onto the same session.
/// Dropping a handle releases one reference. When the last reference goes,
/// the disposing callbacks run in registration order and then the mapper is
/// disposed, exactly once, unless the session was opened with
/// [`shared`](Self::shared) or rebound onto an externally owned mapper via
/// [`connect_to_shared_mapper`](Self::connect_to_shared_mapper).
pub struct UnitOfWork<M: Mapper> {
    session: Arc<Session<M>>,
}

struct Session<M> {
    id: u64,
    state: Mutex<SessionState<M>>,
}

struct SessionState<M> {
    mapper: M,
    owns_mapper: bool,
    references: u32,
    on_disposing: Vec<Box<dyn FnOnce() + Send>>,
}

impl<M> Session<M> {
    fn state(&self) -> MutexGuard<'_, SessionState<M>> {
        // A poisoned session still has references to release.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M: Mapper> UnitOfWork<M> {
    /// Opens a new session owning `mapper`, with a reference count of one.
    pub fn new(mapper: M) -> Self {
        Self::open(mapper, true)
    }

    /// Opens a session over a mapper whose lifecycle is owned elsewhere.
    /// Teardown still runs disposing callbacks but leaves the mapper alive,
    /// as if [`connect_to_shared_mapper`](Self::connect_to_shared_mapper)
    /// had been called right after [`new`](Self::new).
    pub fn shared(mapper: M) -> Self {
        Self::open(mapper, false)
    }

    fn open(mapper: M, owns_mapper: bool) -> Self {
        let id = NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(session = id, owns_mapper, "unit of work opened");
        Self {
            session: Arc::new(Session {
                id,
                state: Mutex::new(SessionState {
                    mapper,
                    owns_mapper,
                    references: 1,
                    on_disposing: Vec::new(),
                }),
            }),
        }
    }

    /// Hands out another handle onto this session, incrementing the
    /// reference count. The session is torn down by whichever handle is
    /// released last.
    pub fn attach(&self) -> Self {
        self.session.state().references += 1;
        Self {
            session: Arc::clone(&self.session),
        }
    }

    /// Session id, unique per process run. Carried in trace output so
    /// collaborating handlers can be seen sharing one session.
    pub fn id(&self) -> u64 {
        self.session.id
    }

    /// Registers a callback to run when the last handle is released,
    /// before the mapper is disposed.
    pub fn on_disposing(&self, callback: impl FnOnce() + Send + 'static) {
        self.session.state().on_disposing.push(Box::new(callback));
    }

    /// Rebinds this session onto a mapper whose lifecycle is owned
    /// elsewhere. After this call, tearing the session down no longer
    /// disposes any mapper.
    pub fn connect_to_shared_mapper(&self, mapper: M) {
        let mut state = self.session.state();
        state.mapper = mapper;
        state.owns_mapper = false;
    }

    /// A handle onto the currently bound mapper.
    pub fn mapper(&self) -> M {
        self.session.state().mapper.clone()
    }

    /// Delegates to the mapper. Store failures propagate unchanged.
    pub async fn submit_changes(&self) -> Result<()> {
        let mapper = self.mapper();
        mapper.submit_changes().await
    }

    /// Drops every pending registration in the mapper.
    pub async fn evict_all(&self) {
        let mapper = self.mapper();
        mapper.evict_all().await;
    }

    /// Drops the pending registration for one aggregate.
    pub async fn evict<A>(&self, key: &A::Key)
    where
        A: AggregateRoot,
        M: AggregateMapper<A>,
    {
        let mapper = self.mapper();
        mapper.evict(key).await;
    }
}

impl<M: Mapper> Drop for UnitOfWork<M> {
    fn drop(&mut self) {
        let teardown = {
            let mut state = self.session.state();
            state.references -= 1;
            if state.references == 0 {
                let callbacks = std::mem::take(&mut state.on_disposing);
                let mapper = state.owns_mapper.then(|| state.mapper.clone());
                Some((callbacks, mapper))
            } else {
                None
            }
        };

        // Callbacks run outside the session lock and before mapper disposal.
        if let Some((callbacks, mapper)) = teardown {
            for callback in callbacks {
                callback();
            }
            if let Some(mapper) = mapper {
                mapper.dispose();
            }
            tracing::debug!(session = self.session.id, "unit of work disposed");
        }
    }
}
