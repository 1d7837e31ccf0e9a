use crate::domain_model::RefreshOutcome;
use tokio::sync::oneshot;

/// Followers waiting on an in-flight refresh, in enrollment order. Not
/// synchronized by itself: the coordinator locks it together with the
/// refresh state, so enrollment and the Refreshing observation happen in
/// one critical section and no follower can slip in after a drain.
pub struct RetryQueue {
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

impl RetryQueue {
    pub fn new() -> Self {
        Self {
            waiters: Vec::new(),
        }
    }

    /// Register a follower. The returned handle settles exactly once.
    pub fn enroll(&mut self) -> oneshot::Receiver<RefreshOutcome> {
        let (tx, rx) = oneshot::channel();
        self.waiters.push(tx);
        rx
    }

    /// Settle every enrolled follower with `outcome` and empty the queue.
    pub fn drain_and_resolve(&mut self, outcome: &RefreshOutcome) {
        for waiter in self.waiters.drain(..) {
            // A follower whose task was dropped has closed its receiver.
            let _ = waiter.send(outcome.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }
}

impl Default for RetryQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_model::AccessToken;

    #[tokio::test]
    async fn every_follower_settles_with_the_drained_outcome() {
        let mut queue = RetryQueue::new();
        let first = queue.enroll();
        let second = queue.enroll();
        assert_eq!(queue.len(), 2);

        let outcome = RefreshOutcome::Retry(AccessToken("fresh".into()));
        queue.drain_and_resolve(&outcome);
        assert!(queue.is_empty());

        assert_eq!(first.await.unwrap(), outcome);
        assert_eq!(second.await.unwrap(), outcome);
    }

    #[tokio::test]
    async fn draining_an_empty_queue_is_a_no_op() {
        let mut queue = RetryQueue::new();
        queue.drain_and_resolve(&RefreshOutcome::Invalid);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn dropped_followers_do_not_block_a_drain() {
        let mut queue = RetryQueue::new();
        drop(queue.enroll());
        let live = queue.enroll();

        queue.drain_and_resolve(&RefreshOutcome::Invalid);
        assert_eq!(live.await.unwrap(), RefreshOutcome::Invalid);
    }
}
