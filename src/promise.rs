//! Blocking promise/future pair for handing one result between threads
//!
//! A [`Sender`] publishes exactly one outcome (a value or a [`Failure`]); its
//! single [`Receiver`] blocks until that outcome exists and retrieves it
//! exactly once. Both handles share one state guarded by a mutex and a
//! condition variable, freed when the last handle goes away.
//!
//! 用于在线程间传递单个结果的阻塞式 promise/future 对
//!
//! [`Sender`] 恰好发布一次结果（值或 [`Failure`]）；其唯一的 [`Receiver`]
//! 阻塞直到结果存在，并且恰好取出一次。两个句柄共享同一个由互斥锁和条件变量
//! 保护的状态，最后一个句柄释放时该状态被销毁。
//!
//! # Lifecycle | 生命周期
//!
//! ```text
//! Unbound
//! Bound(pending) ──publish──▶ Bound(ready) ──get──▶ Consumed
//! ```
//!
//! - `Unbound` (default-constructed) and `Consumed` receivers are invalid:
//!   `wait`, `wait_for` and `get` fail with [`PromiseError::NoSharedState`].
//! - Publishing twice fails with [`PromiseError::AlreadySatisfied`].
//! - Issuing a second receiver fails with [`PromiseError::ReceiverAlreadyIssued`].
//! - A sender dropped before publishing delivers a broken promise failure,
//!   so a blocked receiver is always released.
//!
//! # Example
//!
//! ```
//! use lite_promise::promise::Sender;
//! use std::thread;
//!
//! let sender = Sender::<u32>::new();
//! let mut receiver = sender.receiver().unwrap();
//!
//! thread::spawn(move || {
//!     // ... do work ...
//!     sender.set_value(42).unwrap();
//! });
//!
//! assert_eq!(receiver.get().unwrap(), 42);
//! assert!(!receiver.is_valid());
//! ```
//!
//! Failures keep their concrete type across the thread boundary:
//!
//! ```
//! use lite_promise::promise::channel;
//! use std::io;
//!
//! let (sender, mut receiver) = channel::<u32>();
//! sender.set_failure(io::Error::new(io::ErrorKind::TimedOut, "upstream")).unwrap();
//!
//! let failure = receiver.get().unwrap_err().into_failure().unwrap();
//! assert_eq!(failure.downcast_ref::<io::Error>().unwrap().kind(), io::ErrorKind::TimedOut);
//! ```
//!
//! # Thread Safety | 线程安全
//!
//! - `Sender<T>` and `Receiver<T>` are `Send + Sync` when `T: Send`
//! - All writes made by the producer before publishing are visible to the
//!   receiver once it observes the result
//! - No user code runs while the internal lock is held
//!
//! - 当 `T: Send` 时，`Sender<T>` 和 `Receiver<T>` 均为 `Send + Sync`
//! - 接收器观察到结果后，生产者在发布之前的所有写入对其可见
//! - 持有内部锁期间不会运行任何用户代码

pub mod error;
mod receiver;
mod sender;
mod shared;

pub use self::error::{BoxError, Failure, GetError, PromiseError};
pub use self::receiver::Receiver;
pub use self::sender::Sender;

/// Create a sender together with its receiver
///
/// 创建一个发送器及其接收器
#[inline]
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    Sender::with_receiver()
}

// Both handles must be able to move to, and be shared with, other threads.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Sender<String>>();
    assert_send_sync::<Receiver<String>>();
};
