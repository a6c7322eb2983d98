//! Promise error types.
//!
//! Promise 错误类型。
//!
//! Two kinds of errors cross this API:
//!
//! - [`PromiseError`] reports misuse of a handle (publishing twice, reading an
//!   invalid receiver, ...). It is returned directly to the offending call.
//! - [`Failure`] is an application error published by the producer with
//!   [`Sender::set_failure`](super::Sender::set_failure). It is transported
//!   untouched and only surfaces from [`Receiver::get`](super::Receiver::get).
//!
//! [`GetError`] is the union of both, as returned by the retrieval operations.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed, thread-safe error object carried by a [`Failure`]
///
/// [`Failure`] 携带的装箱、线程安全的错误对象
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Usage error raised by promise handles
///
/// Promise 句柄的使用错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PromiseError {
    /// The receiver is not bound to a shared state, or its result was already retrieved
    ///
    /// 接收器未绑定共享状态，或其结果已被取出
    #[error("no shared state")]
    NoSharedState,
    /// A value or failure was already published to the shared state
    ///
    /// 共享状态中已存储值或失败
    #[error("promise already satisfied")]
    AlreadySatisfied,
    /// The receiver for this promise was already handed out
    ///
    /// 该 promise 的接收器已被取走
    #[error("receiver already issued")]
    ReceiverAlreadyIssued,
    /// The sender was dropped without publishing anything
    ///
    /// Never returned directly: it reaches the receiver wrapped in a [`Failure`].
    ///
    /// 发送器在发布任何结果之前被丢弃
    ///
    /// 不会被直接返回：它以 [`Failure`] 的形式到达接收器。
    #[error("broken promise")]
    BrokenPromise,
}

/// Opaque application failure transported from the sender to the receiver
///
/// Wraps the original error object, so its concrete type and message survive
/// the trip across threads and can be recovered with [`Failure::downcast_ref`].
///
/// 从发送器传递到接收器的不透明应用失败
///
/// 包装原始错误对象，使其具体类型和消息在跨线程传递后依然保留，
/// 可通过 [`Failure::downcast_ref`] 恢复。
///
/// `Display` and [`source`](StdError::source) are forwarded to the wrapped
/// error, so error reporters see the producer's full cause chain.
pub struct Failure(BoxError);

impl Failure {
    /// Wrap an error value
    ///
    /// 包装一个错误值
    #[inline]
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Failure::from_boxed(Box::new(error))
    }

    /// Build a failure from a plain message
    ///
    /// 从纯文本消息构建失败
    #[inline]
    pub fn msg<M>(message: M) -> Self
    where
        M: fmt::Display,
    {
        Failure(message.to_string().into())
    }

    /// Wrap an already boxed error
    ///
    /// A boxed `Failure` is unwrapped rather than nested.
    #[inline]
    pub fn from_boxed(error: BoxError) -> Self {
        match error.downcast::<Failure>() {
            Ok(failure) => *failure,
            Err(error) => Failure(error),
        }
    }

    pub(crate) fn broken_promise() -> Self {
        Failure::new(PromiseError::BrokenPromise)
    }

    /// Returns `true` if the wrapped error is of type `E`
    #[inline]
    pub fn is<E>(&self) -> bool
    where
        E: StdError + 'static,
    {
        self.0.is::<E>()
    }

    /// Borrow the wrapped error as `E`, if that is its concrete type
    ///
    /// 如果包装的错误具体类型为 `E`，则以 `E` 借用它
    #[inline]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// Take the wrapped error out as `E`, or give the failure back
    pub fn downcast<E>(self) -> Result<E, Self>
    where
        E: StdError + 'static,
    {
        self.0.downcast::<E>().map(|error| *error).map_err(Failure)
    }

    /// Returns `true` if this failure was synthesized because the sender
    /// was dropped without publishing
    ///
    /// 如果该失败是因发送器未发布即被丢弃而合成的，则返回 `true`
    #[inline]
    pub fn is_broken_promise(&self) -> bool {
        self.downcast_ref::<PromiseError>() == Some(&PromiseError::BrokenPromise)
    }

    /// Unwrap into the boxed error
    #[inline]
    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

impl AsRef<dyn StdError + Send + Sync> for Failure {
    fn as_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.0
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// Error returned when retrieving the result of a promise
///
/// 获取 promise 结果时返回的错误
#[derive(Debug, Error)]
pub enum GetError {
    /// The receiver was misused
    ///
    /// 接收器被误用
    #[error(transparent)]
    Usage(#[from] PromiseError),
    /// The sender published a failure, or was dropped without publishing
    ///
    /// 发送器发布了失败，或未发布即被丢弃
    #[error(transparent)]
    Failed(#[from] Failure),
}

impl GetError {
    /// Borrow the published failure, if any
    #[inline]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            GetError::Failed(failure) => Some(failure),
            GetError::Usage(_) => None,
        }
    }

    /// Convert into the published failure, if any
    #[inline]
    pub fn into_failure(self) -> Option<Failure> {
        match self {
            GetError::Failed(failure) => Some(failure),
            GetError::Usage(_) => None,
        }
    }

    /// Borrow the usage error, if any
    #[inline]
    pub fn usage(&self) -> Option<PromiseError> {
        match self {
            GetError::Usage(error) => Some(*error),
            GetError::Failed(_) => None,
        }
    }

    /// Returns `true` if the sender was dropped without publishing
    #[inline]
    pub fn is_broken_promise(&self) -> bool {
        self.failure().is_some_and(Failure::is_broken_promise)
    }
}

// Compile-time check that failures can cross threads.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<Failure>();
    assert_send_sync::<GetError>();
};
