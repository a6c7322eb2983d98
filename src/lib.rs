//! # lite-promise
//!
//! Lightweight blocking promise/future pair for Rust threads.
//!
//! 轻量级的 Rust 线程阻塞式 promise/future 对。
//!
//! ## Overview / 概述
//!
//! `lite-promise` hands exactly one result from a producer thread to a consumer
//! thread. The producer publishes a value or an application failure once; the
//! consumer blocks until the result exists (optionally with a timeout) and
//! retrieves it once. No runtime, executor or extra thread is involved.
//!
//! `lite-promise` 将恰好一个结果从生产者线程传递到消费者线程。生产者只发布一次值或应用失败；
//! 消费者阻塞直到结果存在（可选超时），并只取出一次。不涉及运行时、执行器或额外线程。
//!
//! ## Key Features / 主要特性
//!
//! - **Exactly-once write and read**: repeated publishing or retrieval is reported as an error
//! - **Transportable failures**: the original error object reaches the consumer intact
//! - **No abandoned waiters**: dropping an unfulfilled sender releases the receiver
//! - **Timed waits**: `wait_for` / `wait_until` for bounded blocking
//!
//! - **恰好一次写入与读取**：重复发布或取出会报告为错误
//! - **可传递的失败**：原始错误对象完整到达消费者
//! - **不会遗弃等待者**：丢弃未完成的发送器会释放接收器
//! - **定时等待**：`wait_for` / `wait_until` 用于有界阻塞
//!
//! ## Modules / 模块
//!
//! ### [`promise`]
//!
//! The [`promise::Sender`] / [`promise::Receiver`] pair and its error types.
//!
//! [`promise::Sender`] / [`promise::Receiver`] 对及其错误类型。
//!
//! ## Examples / 示例
//!
//! ```
//! use lite_promise::promise::{channel, Failure};
//! use std::thread;
//! use std::time::Duration;
//!
//! let (sender, mut receiver) = channel::<String>();
//!
//! thread::spawn(move || {
//!     thread::sleep(Duration::from_millis(10));
//!     if let Err(err) = sender.set_value("done".to_string()) {
//!         panic!("{err}");
//!     }
//! });
//!
//! // Poll with a timeout before committing to a blocking get.
//! while !receiver.wait_for(Duration::from_millis(1)).unwrap() {}
//! assert_eq!(receiver.get().unwrap(), "done");
//!
//! // A sender dropped without publishing is reported, not waited on forever.
//! let (sender, mut receiver) = channel::<String>();
//! drop(sender);
//! assert!(receiver.get().unwrap_err().is_broken_promise());
//!
//! let (sender, mut receiver) = channel::<String>();
//! sender.set_failure(Failure::msg("test error")).unwrap();
//! assert_eq!(receiver.get().unwrap_err().to_string(), "test error");
//! ```
//!
//! ## Feature flags / 特性开关
//!
//! - `loom`: build the synchronization primitives on top of [loom](https://docs.rs/loom)
//!   for model checking. Only meant for `cargo test --features loom`.
//!
//! - `loom`：基于 loom 构建同步原语以进行模型检查。仅用于 `cargo test --features loom`。

mod shim;

pub mod promise;
