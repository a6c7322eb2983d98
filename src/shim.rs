//! Shim module to abstract over std and loom primitives.
//!
//! The shared state only needs a reference count, a mutex and a condition
//! variable. This module switches them between the `std` implementation (for
//! production) and the `loom` implementation (for model checking).

#[cfg(not(feature = "loom"))]
pub mod sync {
    pub use std::sync::{Arc, Condvar, Mutex, MutexGuard};
}

#[cfg(feature = "loom")]
pub mod sync {
    pub use loom::sync::{Arc, Condvar, Mutex, MutexGuard};
}
