//! Consumer side of a promise.
//!
//! Promise 的消费者端。

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::shim::sync::Arc;

use super::error::{GetError, PromiseError};
use super::shared::Shared;

/// Read-once handle waiting for the result of a [`Sender`](super::Sender)
///
/// A receiver is *valid* while it is bound to a shared state whose result
/// has not been retrieved yet. A default-constructed receiver is never
/// valid, and every receiver becomes invalid once [`Receiver::get`] returns,
/// whether it returned a value or a failure.
///
/// 等待 [`Sender`](super::Sender) 结果的一次性读取句柄
///
/// 当接收器绑定到一个结果尚未被取出的共享状态时，它是*有效*的。
/// 默认构造的接收器永远无效；[`Receiver::get`] 返回后，无论返回的是值还是失败，
/// 接收器都会变为无效。
pub struct Receiver<T> {
    shared: Option<Arc<Shared<T>>>,
}

impl<T> Receiver<T> {
    #[inline]
    pub(crate) fn bound(shared: Arc<Shared<T>>) -> Self {
        Self {
            shared: Some(shared),
        }
    }

    #[inline]
    fn shared(&self) -> Result<&Shared<T>, PromiseError> {
        match &self.shared {
            Some(shared) => Ok(shared),
            None => {
                debug!("receiver used without a shared state");
                Err(PromiseError::NoSharedState)
            }
        }
    }

    /// Check whether this receiver can still retrieve a result
    ///
    /// 检查该接收器是否仍可取出结果
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.shared.is_some()
    }

    /// Check whether the result is available without blocking
    ///
    /// Always `false` for an invalid receiver.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.shared.as_ref().is_some_and(|shared| shared.is_ready())
    }

    /// Block until the result is available
    ///
    /// The receiver stays valid. Fails with [`PromiseError::NoSharedState`]
    /// instead of blocking if the receiver is invalid.
    ///
    /// 阻塞直到结果可用
    ///
    /// 接收器保持有效。如果接收器无效，则返回 [`PromiseError::NoSharedState`] 而不是阻塞。
    pub fn wait(&self) -> Result<(), PromiseError> {
        self.shared()?.await_ready();
        Ok(())
    }

    /// Block until the result is available or `timeout` elapses
    ///
    /// Returns `Ok(true)` if the result became available in time and
    /// `Ok(false)` on timeout. May be called repeatedly; never consumes the
    /// result.
    ///
    /// 阻塞直到结果可用或超时
    ///
    /// 结果及时可用时返回 `Ok(true)`，超时返回 `Ok(false)`。可重复调用，不会取走结果。
    pub fn wait_for(&self, timeout: Duration) -> Result<bool, PromiseError> {
        Ok(self.shared()?.await_ready_for(timeout))
    }

    /// Block until the result is available or `deadline` is reached
    ///
    /// Same contract as [`Receiver::wait_for`].
    pub fn wait_until(&self, deadline: Instant) -> Result<bool, PromiseError> {
        Ok(self.shared()?.await_ready_until(deadline))
    }

    /// Wait for the result and retrieve it
    ///
    /// A failure published with [`Sender::set_failure`](super::Sender::set_failure)
    /// is returned as [`GetError::Failed`] carrying the original error. A
    /// sender dropped without publishing yields a broken promise failure.
    /// The receiver is invalid afterwards; calling `get` again fails with
    /// [`PromiseError::NoSharedState`].
    ///
    /// 等待结果并取出
    ///
    /// 通过 `set_failure` 发布的失败会以携带原始错误的 [`GetError::Failed`] 返回。
    /// 之后接收器变为无效；再次调用 `get` 会返回 [`PromiseError::NoSharedState`]。
    pub fn get(&mut self) -> Result<T, GetError> {
        let shared = match self.shared.take() {
            Some(shared) => shared,
            None => {
                debug!("receiver used without a shared state");
                return Err(PromiseError::NoSharedState.into());
            }
        };
        let outcome = shared.take()?;
        trace!(is_value = outcome.is_ok(), "promise result retrieved");
        outcome.map_err(GetError::Failed)
    }

    /// Retrieve the result if it is available, without blocking
    ///
    /// Returns `Ok(None)` and keeps the receiver valid while nothing has
    /// been published. Otherwise behaves like [`Receiver::get`].
    ///
    /// 如果结果可用则取出，不阻塞
    ///
    /// 尚未发布时返回 `Ok(None)` 并保持接收器有效；否则行为与 [`Receiver::get`] 相同。
    pub fn try_get(&mut self) -> Result<Option<T>, GetError> {
        let polled = self.shared()?.try_take();
        let outcome = match polled {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return Ok(None),
            Err(err) => {
                self.shared = None;
                return Err(err.into());
            }
        };
        self.shared = None;
        trace!(is_value = outcome.is_ok(), "promise result retrieved");
        outcome.map(Some).map_err(GetError::Failed)
    }
}

impl<T> Default for Receiver<T> {
    /// Create a receiver not bound to any shared state
    #[inline]
    fn default() -> Self {
        Self { shared: None }
    }
}

impl<T> fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver")
            .field("valid", &self.is_valid())
            .finish_non_exhaustive()
    }
}
