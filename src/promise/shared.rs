//! Shared state backing one sender/receiver pair.
//!
//! 一对发送器/接收器背后的共享状态。

use std::mem;
use std::sync::PoisonError;
use std::time::{Duration, Instant};

use crate::shim::sync::{Arc, Condvar, Mutex, MutexGuard};

use super::error::{Failure, PromiseError};

/// What the sender published: a value or a failure
pub(crate) type Outcome<T> = Result<T, Failure>;

// ============================================================================
// Slot
// ============================================================================

/// Result slot. Only ever moves `Pending -> Ready -> Taken`.
pub(crate) enum Slot<T> {
    /// Nothing published yet
    Pending,
    /// Published, not yet retrieved
    Ready(Outcome<T>),
    /// Retrieved by the receiver
    Taken,
}

impl<T> Slot<T> {
    #[inline]
    fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending)
    }
}

struct State<T> {
    slot: Slot<T>,
    receiver_issued: bool,
}

// ============================================================================
// Shared
// ============================================================================

/// Mutex + condvar pair guarding the result slot
///
/// 保护结果槽的互斥锁与条件变量
pub(crate) struct Shared<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
}

impl<T> Shared<T> {
    #[inline]
    pub(crate) fn new(receiver_issued: bool) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                slot: Slot::Pending,
                receiver_issued,
            }),
            ready: Condvar::new(),
        })
    }

    // No user code runs under the lock, so poisoning can only come from a
    // panic in this module; the state is still consistent in that case.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn park<'a>(&self, guard: MutexGuard<'a, State<T>>) -> MutexGuard<'a, State<T>> {
        self.ready.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn park_timeout<'a>(
        &self,
        guard: MutexGuard<'a, State<T>>,
        timeout: Duration,
    ) -> MutexGuard<'a, State<T>> {
        match self.ready.wait_timeout(guard, timeout) {
            Ok((guard, _)) => guard,
            Err(poisoned) => poisoned.into_inner().0,
        }
    }

    /// Mark the receiver as issued
    ///
    /// Fails with `ReceiverAlreadyIssued` on every call after the first.
    pub(crate) fn issue_receiver(&self) -> Result<(), PromiseError> {
        let mut state = self.lock();
        if mem::replace(&mut state.receiver_issued, true) {
            return Err(PromiseError::ReceiverAlreadyIssued);
        }
        Ok(())
    }

    /// Store the outcome and wake every waiter
    ///
    /// Fails with `AlreadySatisfied` if anything was published before; the
    /// stored outcome is left untouched and the rejected one is dropped
    /// after the lock is released.
    ///
    /// 存储结果并唤醒所有等待者
    pub(crate) fn publish(&self, outcome: Outcome<T>) -> Result<(), PromiseError> {
        let mut state = self.lock();
        if !state.slot.is_pending() {
            drop(state);
            drop(outcome);
            return Err(PromiseError::AlreadySatisfied);
        }
        state.slot = Slot::Ready(outcome);
        drop(state);

        self.ready.notify_all();
        Ok(())
    }

    /// Publish a broken promise failure if nothing was published yet
    ///
    /// Returns `true` if this call published.
    pub(crate) fn abandon(&self) -> bool {
        let mut state = self.lock();
        if !state.slot.is_pending() {
            return false;
        }
        state.slot = Slot::Ready(Err(Failure::broken_promise()));
        drop(state);

        self.ready.notify_all();
        true
    }

    /// Whether an outcome was published (retrieved or not)
    #[inline]
    pub(crate) fn is_ready(&self) -> bool {
        !self.lock().slot.is_pending()
    }

    /// Block until an outcome is published
    pub(crate) fn await_ready(&self) {
        let mut state = self.lock();
        while state.slot.is_pending() {
            state = self.park(state);
        }
    }

    /// Block until an outcome is published or `deadline` passes
    ///
    /// Returns whether the outcome was observed.
    pub(crate) fn await_ready_until(&self, deadline: Instant) -> bool {
        let mut state = self.lock();
        loop {
            if !state.slot.is_pending() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            state = self.park_timeout(state, remaining);
        }
    }

    /// Block until an outcome is published or `timeout` elapses
    pub(crate) fn await_ready_for(&self, timeout: Duration) -> bool {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.await_ready_until(deadline),
            // Deadline not representable: as good as forever.
            None => {
                self.await_ready();
                true
            }
        }
    }

    /// Block until an outcome is published, then move it out
    ///
    /// Fails with `NoSharedState` if it was already taken.
    ///
    /// 阻塞直到结果发布，然后将其移出
    pub(crate) fn take(&self) -> Result<Outcome<T>, PromiseError> {
        let mut state = self.lock();
        while state.slot.is_pending() {
            state = self.park(state);
        }
        Self::take_ready(&mut state)
    }

    /// Move the outcome out if it is published, without blocking
    ///
    /// Returns `Ok(None)` while nothing is published.
    pub(crate) fn try_take(&self) -> Result<Option<Outcome<T>>, PromiseError> {
        let mut state = self.lock();
        if state.slot.is_pending() {
            return Ok(None);
        }
        Self::take_ready(&mut state).map(Some)
    }

    fn take_ready(state: &mut State<T>) -> Result<Outcome<T>, PromiseError> {
        match mem::replace(&mut state.slot, Slot::Taken) {
            Slot::Ready(outcome) => Ok(outcome),
            Slot::Taken => Err(PromiseError::NoSharedState),
            Slot::Pending => {
                state.slot = Slot::Pending;
                Err(PromiseError::NoSharedState)
            }
        }
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use std::thread;

    fn value_of(outcome: Outcome<i32>) -> i32 {
        match outcome {
            Ok(value) => value,
            Err(failure) => panic!("unexpected failure: {failure}"),
        }
    }

    #[test]
    fn test_publish_then_take() {
        let shared = Shared::<i32>::new(false);
        assert!(!shared.is_ready());

        shared.publish(Ok(5)).unwrap();
        assert!(shared.is_ready());
        assert_eq!(value_of(shared.take().unwrap()), 5);

        // Still "ready" after retrieval; the slot never reverts.
        assert!(shared.is_ready());
    }

    #[test]
    fn test_publish_twice_keeps_first() {
        let shared = Shared::<i32>::new(false);
        shared.publish(Ok(1)).unwrap();
        assert_eq!(shared.publish(Ok(2)), Err(PromiseError::AlreadySatisfied));
        assert_eq!(
            shared.publish(Err(Failure::msg("late"))),
            Err(PromiseError::AlreadySatisfied)
        );
        assert_eq!(value_of(shared.take().unwrap()), 1);
    }

    #[test]
    fn test_publish_after_take_rejected() {
        let shared = Shared::<i32>::new(false);
        shared.publish(Ok(1)).unwrap();
        shared.take().unwrap().unwrap();
        assert_eq!(shared.publish(Ok(2)), Err(PromiseError::AlreadySatisfied));
    }

    #[test]
    fn test_take_twice() {
        let shared = Shared::<i32>::new(false);
        shared.publish(Ok(1)).unwrap();
        shared.take().unwrap().unwrap();
        assert!(matches!(shared.take(), Err(PromiseError::NoSharedState)));
        assert!(matches!(shared.try_take(), Err(PromiseError::NoSharedState)));
    }

    #[test]
    fn test_try_take_pending() {
        let shared = Shared::<i32>::new(false);
        assert!(matches!(shared.try_take(), Ok(None)));
        shared.publish(Ok(3)).unwrap();
        assert_eq!(value_of(shared.try_take().unwrap().unwrap()), 3);
    }

    #[test]
    fn test_issue_receiver_once() {
        let shared = Shared::<i32>::new(false);
        assert_eq!(shared.issue_receiver(), Ok(()));
        assert_eq!(
            shared.issue_receiver(),
            Err(PromiseError::ReceiverAlreadyIssued)
        );

        let shared = Shared::<i32>::new(true);
        assert_eq!(
            shared.issue_receiver(),
            Err(PromiseError::ReceiverAlreadyIssued)
        );
    }

    #[test]
    fn test_abandon_only_when_pending() {
        let shared = Shared::<i32>::new(false);
        assert!(shared.abandon());
        assert!(!shared.abandon());
        let failure = shared.take().unwrap().unwrap_err();
        assert!(failure.is_broken_promise());

        let shared = Shared::<i32>::new(false);
        shared.publish(Ok(9)).unwrap();
        assert!(!shared.abandon());
        assert_eq!(value_of(shared.take().unwrap()), 9);
    }

    #[test]
    fn test_await_ready_for_times_out() {
        let shared = Shared::<i32>::new(false);
        let start = Instant::now();
        assert!(!shared.await_ready_for(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
        // Timing out does not consume anything.
        assert!(matches!(shared.try_take(), Ok(None)));
    }

    #[test]
    fn test_await_ready_for_zero() {
        let shared = Shared::<i32>::new(false);
        assert!(!shared.await_ready_for(Duration::ZERO));
        shared.publish(Ok(1)).unwrap();
        assert!(shared.await_ready_for(Duration::ZERO));
    }

    #[test]
    fn test_await_ready_for_huge_timeout() {
        let shared = Shared::<i32>::new(false);
        shared.publish(Ok(1)).unwrap();
        assert!(shared.await_ready_for(Duration::MAX));
    }

    #[test]
    fn test_await_ready_until_past_deadline() {
        let shared = Shared::<i32>::new(false);
        assert!(!shared.await_ready_until(Instant::now()));
    }

    #[test]
    fn test_take_blocks_until_publish() {
        let shared = Shared::<String>::new(false);
        let producer = shared.clone();

        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            producer.publish(Ok("hello".to_string())).unwrap();
        });

        match shared.take().unwrap() {
            Ok(value) => assert_eq!(value, "hello"),
            Err(failure) => panic!("unexpected failure: {failure}"),
        }
        handle.join().unwrap();
    }

    #[test]
    fn test_notify_all_wakes_every_waiter() {
        let shared = Shared::<i32>::new(false);

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || shared.await_ready())
            })
            .collect();

        thread::sleep(Duration::from_millis(10));
        shared.publish(Ok(1)).unwrap();

        for waiter in waiters {
            waiter.join().unwrap();
        }
    }

    #[test]
    fn test_unretrieved_value_dropped_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static DROPS: AtomicUsize = AtomicUsize::new(0);

        struct Tracked;
        impl Drop for Tracked {
            fn drop(&mut self) {
                DROPS.fetch_add(1, Ordering::SeqCst);
            }
        }

        let shared = Shared::<Tracked>::new(false);
        shared.publish(Ok(Tracked)).unwrap();
        assert!(shared.publish(Ok(Tracked)).is_err());
        assert_eq!(DROPS.load(Ordering::SeqCst), 1);

        drop(shared);
        assert_eq!(DROPS.load(Ordering::SeqCst), 2);
    }
}
