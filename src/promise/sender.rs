//! Producer side of a promise.
//!
//! Promise 的生产者端。

use std::fmt;

use tracing::{debug, trace};

use crate::shim::sync::Arc;

use super::error::{BoxError, Failure, PromiseError};
use super::receiver::Receiver;
use super::shared::{Outcome, Shared};

/// Write-once handle publishing a value or a failure
///
/// Every sender owns a fresh shared state and hands out at most one
/// [`Receiver`]. Dropping a sender that never published releases the
/// receiver with a broken promise failure instead of leaving it blocked.
///
/// 发布值或失败的一次性写入句柄
///
/// 每个发送器拥有一个新的共享状态，并且最多分发一个 [`Receiver`]。
/// 若发送器在发布之前被丢弃，接收器会收到 broken promise 失败，而不是永远阻塞。
pub struct Sender<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Sender<T> {
    /// Create a sender with a fresh shared state
    ///
    /// No receiver is issued yet; see [`Sender::receiver`].
    ///
    /// 创建一个带有新共享状态的发送器
    #[inline]
    pub fn new() -> Self {
        Self {
            shared: Shared::new(false),
        }
    }

    /// Create a sender whose receiver is already issued
    #[inline]
    pub(crate) fn with_receiver() -> (Self, Receiver<T>) {
        let shared = Shared::new(true);
        let receiver = Receiver::bound(shared.clone());
        (Self { shared }, receiver)
    }

    /// Issue the receiver bound to this sender
    ///
    /// Only one receiver exists per sender: every call after the first
    /// fails with [`PromiseError::ReceiverAlreadyIssued`]. Publishing does
    /// not require a receiver to have been issued.
    ///
    /// 分发与该发送器绑定的接收器
    ///
    /// 每个发送器只存在一个接收器：第一次之后的调用都会返回
    /// [`PromiseError::ReceiverAlreadyIssued`]。
    pub fn receiver(&self) -> Result<Receiver<T>, PromiseError> {
        if let Err(err) = self.shared.issue_receiver() {
            debug!("receiver requested twice");
            return Err(err);
        }
        Ok(Receiver::bound(self.shared.clone()))
    }

    /// Publish a value and wake the receiver
    ///
    /// Fails with [`PromiseError::AlreadySatisfied`] if a value or failure
    /// was already published; the stored result is left untouched.
    ///
    /// 发布一个值并唤醒接收器
    ///
    /// 如果已发布过值或失败，返回 [`PromiseError::AlreadySatisfied`]；已存储的结果保持不变。
    #[inline]
    pub fn set_value(&self, value: T) -> Result<(), PromiseError> {
        self.publish(Ok(value))
    }

    /// Publish a failure and wake the receiver
    ///
    /// Accepts any error type, a message string, or a [`Failure`]. The
    /// failure reaches [`Receiver::get`] unchanged. Same exactly-once
    /// contract as [`Sender::set_value`].
    ///
    /// 发布一个失败并唤醒接收器
    #[inline]
    pub fn set_failure(&self, failure: impl Into<BoxError>) -> Result<(), PromiseError> {
        self.publish(Err(Failure::from_boxed(failure.into())))
    }

    /// Check whether a value or failure has been published
    ///
    /// 检查是否已发布值或失败
    #[inline]
    pub fn is_satisfied(&self) -> bool {
        self.shared.is_ready()
    }

    fn publish(&self, outcome: Outcome<T>) -> Result<(), PromiseError> {
        let is_value = outcome.is_ok();
        match self.shared.publish(outcome) {
            Ok(()) => {
                trace!(is_value, "promise satisfied");
                Ok(())
            }
            Err(err) => {
                debug!(is_value, "promise already satisfied, result rejected");
                Err(err)
            }
        }
    }
}

impl<T> Default for Sender<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Sender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("satisfied", &self.is_satisfied())
            .finish_non_exhaustive()
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        if self.shared.abandon() {
            debug!("sender dropped without publishing, broken promise delivered");
        }
    }
}
