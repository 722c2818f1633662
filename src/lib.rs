//! Non-blocking locks that report contention instead of waiting.
//!
//! Acquiring one of these locks either succeeds immediately or fails immediately.
//! No caller is ever suspended waiting for a release.
//! This is useful for single-flight guards and best-effort deduplication of concurrent work,
//! where waiting would serialize work that should be skipped instead.
//!
//! Releasing a lock that is not held is a caller bug and panics.
//!
//! # Examples
//!
//! ```
//! use try_mutex::NonBlockingLock;
//!
//! static REFRESH: NonBlockingLock = NonBlockingLock::new();
//!
//! fn refresh() -> bool {
//!     if !REFRESH.try_acquire() {
//!         // Someone else is already refreshing.
//!         return false;
//!     }
//!     // ... do the work ...
//!     REFRESH.release();
//!     true
//! }
//!
//! assert!(refresh());
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod lock;
pub mod unsync;

pub use lock::{NonBlockingLock, TryMutex, TryMutexGuard};

#[cfg(not(feature = "portable_atomic"))]
use core::sync::atomic;
#[cfg(feature = "portable_atomic")]
use portable_atomic as atomic;
