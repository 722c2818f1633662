//! A non-blocking lock that does not implement `Sync`.
//!
//! This lock is meant for single-threaded code that still needs a "busy" flag,
//! such as guarding against re-entrant callbacks.
//! Not implementing `Sync` permits a slightly more efficient implementation.
//!
//! For the variant that does implement `Sync`, see [`NonBlockingLock`](crate::NonBlockingLock).

use core::cell::Cell;

use lock_api::{GuardSend, RawMutex, RawMutexFair};

/// A non-blocking lock that does not implement `Sync`.
///
/// # Examples
///
/// ```
/// use try_mutex::unsync::NonBlockingLock;
///
/// let busy = NonBlockingLock::new();
///
/// assert!(busy.try_acquire());
/// // A re-entrant attempt fails instead of deadlocking.
/// assert!(!busy.try_acquire());
///
/// busy.release();
/// assert!(!busy.is_locked());
/// ```
pub struct NonBlockingLock {
    held: Cell<bool>,
}

impl NonBlockingLock {
    /// Creates a new lock in the unlocked state.
    #[inline]
    pub const fn new() -> Self {
        Self {
            held: Cell::new(false),
        }
    }

    /// Attempts to acquire the lock, returning whether the attempt was successful.
    #[inline]
    pub fn try_acquire(&self) -> bool {
        let acquired = !self.held.replace(true);
        if !acquired {
            lock_trace!("try_acquire on a held unsync::NonBlockingLock");
        }
        acquired
    }

    /// Releases the lock.
    ///
    /// # Panics
    ///
    /// Panics if the lock is not held.
    #[inline]
    pub fn release(&self) {
        if !self.held.replace(false) {
            lock_error!("release on an unsync::NonBlockingLock that is not held");
            panic!("called `release` on a `NonBlockingLock` that is not held (double release)");
        }
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.held.get()
    }
}

impl Default for NonBlockingLock {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for NonBlockingLock {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NonBlockingLock")
            .field("held", &self.held.get())
            .finish()
    }
}

unsafe impl RawMutex for NonBlockingLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = Self::new();

    type GuardMarker = GuardSend;

    #[inline]
    fn lock(&self) {
        assert!(
            self.try_acquire(),
            "called `lock` on a `NonBlockingLock` that is already held"
        );
    }

    #[inline]
    fn try_lock(&self) -> bool {
        self.try_acquire()
    }

    #[inline]
    unsafe fn unlock(&self) {
        self.release();
    }

    #[inline]
    fn is_locked(&self) -> bool {
        self.held.get()
    }
}

unsafe impl RawMutexFair for NonBlockingLock {
    #[inline]
    unsafe fn unlock_fair(&self) {
        self.release();
    }

    #[inline]
    unsafe fn bump(&self) {}
}

/// A [`lock_api::Mutex`] based on [`NonBlockingLock`].
pub type TryMutex<T> = lock_api::Mutex<NonBlockingLock, T>;

/// A [`lock_api::MutexGuard`] based on [`NonBlockingLock`].
pub type TryMutexGuard<'a, T> = lock_api::MutexGuard<'a, NonBlockingLock, T>;
