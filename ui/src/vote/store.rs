//! The shared counter store: point reads, atomic read-modify-write, and a
//! live snapshot feed.
//!
//! The backend proper is an external transactional document store; the core
//! only depends on the three primitives below. [`MemoryCounterStore`] is the
//! in-process implementation backing a single-session client and the test
//! double for the concurrency properties: commits are optimistic against a
//! document version, so two clients incrementing concurrently both land and
//! no update is lost.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use futures::future::LocalBoxFuture;

use super::tally::VoteTally;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Optimistic commit kept colliding with concurrent writers.
    Contention,
    /// Backend unreachable.
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contention => write!(f, "vote transaction kept conflicting; try again"),
            Self::Unavailable(reason) => write!(f, "vote store unavailable: {reason}"),
        }
    }
}

impl std::error::Error for StoreError {}

pub type SnapshotHandler = Box<dyn Fn(VoteTally) + Send + Sync + 'static>;

/// The mutation a transaction applies to the current counters. It may run
/// more than once if the commit retries, so it must stay pure.
pub type ApplyFn<'a> = Box<dyn FnMut(VoteTally) -> VoteTally + Send + 'a>;

pub trait CounterStore {
    /// Point read; `None` means the document does not exist yet.
    fn read(&self) -> LocalBoxFuture<'_, Result<Option<VoteTally>, StoreError>>;

    /// Atomic read-modify-write. An absent document reads as zero counters;
    /// the full updated pair is written back and returned. Concurrent
    /// increments from independent clients must all be reflected.
    fn transact<'a>(&'a self, apply: ApplyFn<'a>)
        -> LocalBoxFuture<'a, Result<VoteTally, StoreError>>;

    /// Register a live-update handler. Every pushed snapshot is authoritative
    /// and fully replaces cached totals. The current document, if any, is
    /// delivered immediately. Dropping the returned [`Subscription`] detaches
    /// the handler.
    fn subscribe(&self, handler: SnapshotHandler) -> Subscription;
}

// Shells and tests hand the store around as `Arc<MemoryCounterStore>`.
impl<T: CounterStore + ?Sized> CounterStore for Arc<T> {
    fn read(&self) -> LocalBoxFuture<'_, Result<Option<VoteTally>, StoreError>> {
        (**self).read()
    }

    fn transact<'a>(
        &'a self,
        apply: ApplyFn<'a>,
    ) -> LocalBoxFuture<'a, Result<VoteTally, StoreError>> {
        (**self).transact(apply)
    }

    fn subscribe(&self, handler: SnapshotHandler) -> Subscription {
        (**self).subscribe(handler)
    }
}

struct VersionedDoc {
    tally: Option<VoteTally>,
    version: u64,
}

type HandlerSlots = Mutex<Vec<Option<SnapshotHandler>>>;

pub struct MemoryCounterStore {
    doc: Mutex<VersionedDoc>,
    handlers: Arc<HandlerSlots>,
}

/// Commit attempts before a transaction gives up with `Contention`.
const MAX_COMMIT_ATTEMPTS: usize = 8;

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self {
            doc: Mutex::new(VersionedDoc {
                tally: None,
                version: 0,
            }),
            handlers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Seed the document, bypassing the transactional path. Test scaffolding
    /// and shell bootstrap only.
    pub fn seed(&self, tally: VoteTally) {
        {
            let mut doc = self.doc.lock().expect("counter doc poisoned");
            doc.tally = Some(tally);
            doc.version += 1;
        }
        self.notify(tally);
    }

    fn snapshot(&self) -> (Option<VoteTally>, u64) {
        let doc = self.doc.lock().expect("counter doc poisoned");
        (doc.tally, doc.version)
    }

    fn commit(&self, expected_version: u64, next: VoteTally) -> bool {
        let mut doc = self.doc.lock().expect("counter doc poisoned");
        if doc.version != expected_version {
            return false;
        }
        doc.tally = Some(next);
        doc.version += 1;
        true
    }

    fn notify(&self, tally: VoteTally) {
        let handlers = self.handlers.lock().expect("handler registry poisoned");
        for slot in handlers.iter().flatten() {
            slot(tally);
        }
    }

    fn run_transaction(&self, apply: &mut dyn FnMut(VoteTally) -> VoteTally) -> Result<VoteTally, StoreError> {
        for _ in 0..MAX_COMMIT_ATTEMPTS {
            let (current, version) = self.snapshot();
            let next = apply(current.unwrap_or_default());
            if self.commit(version, next) {
                self.notify(next);
                return Ok(next);
            }
        }
        Err(StoreError::Contention)
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterStore for MemoryCounterStore {
    fn read(&self) -> LocalBoxFuture<'_, Result<Option<VoteTally>, StoreError>> {
        Box::pin(async move { Ok(self.snapshot().0) })
    }

    fn transact<'a>(
        &'a self,
        mut apply: ApplyFn<'a>,
    ) -> LocalBoxFuture<'a, Result<VoteTally, StoreError>> {
        Box::pin(async move { self.run_transaction(&mut *apply) })
    }

    fn subscribe(&self, handler: SnapshotHandler) -> Subscription {
        let current = self.snapshot().0;
        if let Some(tally) = current {
            handler(tally);
        }

        let mut handlers = self.handlers.lock().expect("handler registry poisoned");
        let index = handlers.len();
        handlers.push(Some(handler));
        Subscription {
            registry: Arc::downgrade(&self.handlers),
            index,
        }
    }
}

/// Handle for a live-update registration. Dropping it detaches the handler,
/// so holding the subscription for the component's lifetime is enough to
/// guarantee teardown.
pub struct Subscription {
    registry: Weak<HandlerSlots>,
    index: usize,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut handlers) = registry.lock() {
                if let Some(slot) = handlers.get_mut(self.index) {
                    *slot = None;
                }
            }
        }
    }
}
