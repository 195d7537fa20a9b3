//! The vote state machine: one controller per client.
//!
//! "Burn" is a one-time irreversible act; "support" is deliberately
//! repeatable for unlocked clients. Once a client burns, both vote paths are
//! closed: a repeat burn is rejected with a message and a support attempt is
//! answered with an acknowledgment prompt instead of a counter write.

use std::fmt;

use crate::core::storage::{ClientVoteState, VoteMemory};

use super::store::{CounterStore, StoreError};
use super::tally::{VoteKind, VoteTally};

/// Shown when a locked client taps burn again. No store call happens.
pub const BURN_REPEAT_MESSAGE: &str = "You already voted against; you can still support.";

/// Modal copy for a support attempt after burning.
pub const LOCKED_PROMPT: &str = "I appreciate the change of heart, but you've made your choice.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotePhase {
    Idle,
    /// A transactional write is in flight; no second vote may start.
    Voting,
    /// This client has cast its permanent burn vote.
    LockedBurn,
}

/// What a `cast` attempt produced. Local policy rejections are outcomes,
/// not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOutcome {
    Committed { tally: VoteTally, kind: VoteKind },
    BurnRepeatRejected,
    SupportBlockedByLock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteError {
    /// A transaction from this client is already in flight.
    VoteInFlight,
    Store(StoreError),
}

impl fmt::Display for VoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VoteInFlight => write!(f, "a vote is already being saved"),
            Self::Store(err) => write!(f, "unable to cast vote: {err}"),
        }
    }
}

impl std::error::Error for VoteError {}

impl From<StoreError> for VoteError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

pub struct VoteController<S, M> {
    store: S,
    memory: M,
    phase: VotePhase,
    mood: Option<VoteKind>,
}

impl<S, M> VoteController<S, M>
where
    S: CounterStore,
    M: VoteMemory,
{
    /// Construct from persisted client state: a previously burned client
    /// starts locked.
    pub fn new(store: S, memory: M) -> Self {
        let state = memory.load();
        let phase = if state.has_voted_burn {
            VotePhase::LockedBurn
        } else {
            VotePhase::Idle
        };
        Self {
            store,
            memory,
            phase,
            mood: state.mood,
        }
    }

    pub fn phase(&self) -> VotePhase {
        self.phase
    }

    pub fn mood(&self) -> Option<VoteKind> {
        self.mood
    }

    pub fn is_locked(&self) -> bool {
        self.phase == VotePhase::LockedBurn
    }

    pub async fn cast(&mut self, kind: VoteKind) -> Result<CastOutcome, VoteError> {
        if self.phase == VotePhase::Voting {
            return Err(VoteError::VoteInFlight);
        }

        if self.is_locked() {
            return Ok(match kind {
                VoteKind::Burn => CastOutcome::BurnRepeatRejected,
                VoteKind::Support => CastOutcome::SupportBlockedByLock,
            });
        }

        let prior = self.phase;
        self.phase = VotePhase::Voting;

        let result = self
            .store
            .transact(Box::new(move |tally: VoteTally| tally.bump(kind)))
            .await;

        match result {
            Ok(tally) => {
                self.phase = if kind == VoteKind::Burn {
                    VotePhase::LockedBurn
                } else {
                    prior
                };
                self.mood = Some(kind);
                self.memory.save(&ClientVoteState {
                    has_voted_burn: self.phase == VotePhase::LockedBurn,
                    mood: self.mood,
                });
                Ok(CastOutcome::Committed { tally, kind })
            }
            Err(err) => {
                // All-or-nothing: the counter was not touched, so the client
                // state machine rolls back too.
                self.phase = prior;
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use futures::executor::block_on;
    use futures::future::LocalBoxFuture;

    use super::*;
    use crate::vote::store::{ApplyFn, MemoryCounterStore, SnapshotHandler, Subscription};

    #[derive(Clone, Default)]
    struct FakeMemory {
        state: Rc<RefCell<ClientVoteState>>,
    }

    impl VoteMemory for FakeMemory {
        fn load(&self) -> ClientVoteState {
            *self.state.borrow()
        }

        fn save(&self, state: &ClientVoteState) {
            *self.state.borrow_mut() = *state;
        }
    }

    struct BrokenStore;

    impl CounterStore for BrokenStore {
        fn read(&self) -> LocalBoxFuture<'_, Result<Option<VoteTally>, StoreError>> {
            Box::pin(async { Err(StoreError::Unavailable("offline".into())) })
        }

        fn transact<'a>(
            &'a self,
            _apply: ApplyFn<'a>,
        ) -> LocalBoxFuture<'a, Result<VoteTally, StoreError>> {
            Box::pin(async { Err(StoreError::Unavailable("offline".into())) })
        }

        fn subscribe(&self, _handler: SnapshotHandler) -> Subscription {
            MemoryCounterStore::new().subscribe(Box::new(|_| {}))
        }
    }

    #[test]
    fn first_burn_commits_and_locks() {
        let store = Arc::new(MemoryCounterStore::new());
        let memory = FakeMemory::default();
        let mut controller = VoteController::new(store.clone(), memory.clone());

        let outcome = block_on(controller.cast(VoteKind::Burn)).unwrap();
        assert_eq!(
            outcome,
            CastOutcome::Committed {
                tally: VoteTally {
                    support: 0,
                    burn: 1,
                },
                kind: VoteKind::Burn,
            }
        );
        assert!(controller.is_locked());
        assert!(memory.load().has_voted_burn);
        assert_eq!(memory.load().mood, Some(VoteKind::Burn));
    }

    #[test]
    fn repeat_burn_short_circuits_without_touching_the_store() {
        let store = Arc::new(MemoryCounterStore::new());
        let mut controller = VoteController::new(store.clone(), FakeMemory::default());

        block_on(controller.cast(VoteKind::Burn)).unwrap();
        let outcome = block_on(controller.cast(VoteKind::Burn)).unwrap();
        assert_eq!(outcome, CastOutcome::BurnRepeatRejected);

        let tally = block_on(store.read()).unwrap().unwrap();
        assert_eq!(tally.burn, 1);
    }

    #[test]
    fn support_after_burn_is_blocked_not_submitted() {
        let store = Arc::new(MemoryCounterStore::new());
        let mut controller = VoteController::new(store.clone(), FakeMemory::default());

        block_on(controller.cast(VoteKind::Burn)).unwrap();
        let outcome = block_on(controller.cast(VoteKind::Support)).unwrap();
        assert_eq!(outcome, CastOutcome::SupportBlockedByLock);

        let tally = block_on(store.read()).unwrap().unwrap();
        assert_eq!(tally.support, 0);
        // The lock survives the blocked attempt.
        assert!(controller.is_locked());
    }

    #[test]
    fn support_is_repeatable_for_unlocked_clients() {
        let store = Arc::new(MemoryCounterStore::new());
        let mut controller = VoteController::new(store.clone(), FakeMemory::default());

        block_on(controller.cast(VoteKind::Support)).unwrap();
        block_on(controller.cast(VoteKind::Support)).unwrap();

        let tally = block_on(store.read()).unwrap().unwrap();
        assert_eq!(tally.support, 2);
        assert_eq!(controller.phase(), VotePhase::Idle);
        assert_eq!(controller.mood(), Some(VoteKind::Support));
    }

    #[test]
    fn store_failure_rolls_back_and_allows_retry() {
        let memory = FakeMemory::default();
        let mut controller = VoteController::new(BrokenStore, memory.clone());

        let err = block_on(controller.cast(VoteKind::Burn)).unwrap_err();
        assert!(matches!(err, VoteError::Store(StoreError::Unavailable(_))));
        assert_eq!(controller.phase(), VotePhase::Idle);
        assert!(!memory.load().has_voted_burn);
    }

    #[test]
    fn persisted_burn_restores_the_lock() {
        let memory = FakeMemory::default();
        memory.save(&ClientVoteState {
            has_voted_burn: true,
            mood: Some(VoteKind::Burn),
        });

        let controller = VoteController::new(Arc::new(MemoryCounterStore::new()), memory);
        assert!(controller.is_locked());
        assert_eq!(controller.mood(), Some(VoteKind::Burn));
    }
}
