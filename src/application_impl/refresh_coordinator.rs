use crate::application_impl::{RetryQueue, SessionTerminator};
use crate::domain_model::RefreshOutcome;
use crate::domain_port::{RefreshGateway, TokenStore};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshState {
    Idle,
    Refreshing,
}

struct Shared {
    state: RefreshState,
    queue: RetryQueue,
    /// Bumped on logout. A leader whose epoch is stale when its refresh
    /// settles discards the result instead of resurrecting the session.
    epoch: u64,
}

enum Role {
    Leader { epoch: u64 },
    Follower(oneshot::Receiver<RefreshOutcome>),
}

/// Collapses N concurrent expiry observations into one refresh call. The
/// first caller to find the state Idle flips it to Refreshing and becomes
/// the leader; everyone else enrolls as a follower and waits on the
/// leader's settlement. The check-and-flip and the enrollment share one
/// critical section with no await point inside, so two callers can never
/// both claim leadership for the same cohort.
pub struct RefreshCoordinator {
    shared: Mutex<Shared>,
    gateway: Arc<dyn RefreshGateway>,
    token_store: Arc<dyn TokenStore>,
    terminator: Arc<SessionTerminator>,
}

impl RefreshCoordinator {
    pub fn new(
        gateway: Arc<dyn RefreshGateway>,
        token_store: Arc<dyn TokenStore>,
        terminator: Arc<SessionTerminator>,
    ) -> Self {
        Self {
            shared: Mutex::new(Shared {
                state: RefreshState::Idle,
                queue: RetryQueue::new(),
                epoch: 0,
            }),
            gateway,
            token_store,
            terminator,
        }
    }

    /// Called by the dispatcher after a first 401. However many callers
    /// arrive concurrently, exactly one refresh network call is made and
    /// every caller receives the same settlement.
    pub async fn coordinate(&self) -> RefreshOutcome {
        let role = {
            let mut shared = self.lock();
            match shared.state {
                RefreshState::Idle => {
                    shared.state = RefreshState::Refreshing;
                    Role::Leader {
                        epoch: shared.epoch,
                    }
                }
                RefreshState::Refreshing => Role::Follower(shared.queue.enroll()),
            }
        };

        match role {
            Role::Leader { epoch } => self.lead(epoch).await,
            Role::Follower(handle) => {
                debug!("enrolled as refresh follower");
                // The sender lives in the queue until a drain settles it;
                // a closed channel can only mean teardown.
                handle.await.unwrap_or(RefreshOutcome::Invalid)
            }
        }
    }

    /// Settle in-flight followers as invalid and make any in-flight leader
    /// discard its result. Called on explicit logout so the queue is never
    /// abandoned while a refresh is still on the wire.
    pub async fn invalidate(&self) {
        {
            let mut shared = self.lock();
            shared.epoch = shared.epoch.wrapping_add(1);
            shared.queue.drain_and_resolve(&RefreshOutcome::Invalid);
        }
        self.terminator.terminate().await;
    }

    async fn lead(&self, epoch: u64) -> RefreshOutcome {
        debug!("leading token refresh");

        let settled = match self.gateway.refresh().await {
            Ok(token) => {
                if self.epoch_is_stale(epoch) {
                    RefreshOutcome::Invalid
                } else {
                    // Store before releasing anyone: a follower must never
                    // replay with a token older than the one just issued.
                    match self.token_store.set(token.clone()).await {
                        Ok(()) => RefreshOutcome::Retry(token),
                        Err(e) => {
                            warn!("failed to store refreshed token: {e}");
                            RefreshOutcome::Invalid
                        }
                    }
                }
            }
            Err(e) => {
                warn!("token refresh failed: {e}");
                RefreshOutcome::Invalid
            }
        };

        let (outcome, undo_store) = {
            let mut shared = self.lock();
            shared.state = RefreshState::Idle;
            let stale = shared.epoch != epoch;
            let outcome = if stale {
                RefreshOutcome::Invalid
            } else {
                settled.clone()
            };
            shared.queue.drain_and_resolve(&outcome);
            // A logout that raced the store write above wins.
            (outcome, stale && matches!(settled, RefreshOutcome::Retry(_)))
        };

        if undo_store {
            if let Err(e) = self.token_store.clear().await {
                warn!("failed to clear token slot after logout race: {e}");
            }
        }
        if outcome == RefreshOutcome::Invalid {
            // Idempotent: a logout that already tore the session down
            // makes this a no-op.
            self.terminator.terminate().await;
        }
        outcome
    }

    fn epoch_is_stale(&self, epoch: u64) -> bool {
        self.lock().epoch != epoch
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().expect("refresh state lock poisoned")
    }

    #[cfg(test)]
    pub(crate) fn pending_followers(&self) -> usize {
        self.lock().queue.len()
    }
}
