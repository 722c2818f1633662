use lock_api::{GuardSend, RawMutex, RawMutexFair};

use crate::atomic::{AtomicBool, Ordering};

/// A mutual-exclusion lock whose acquire never blocks.
///
/// [`try_acquire`] either takes the lock and returns `true`, or sees that it is already held and returns `false`.
/// [`release`] makes the lock available again and panics if the lock is not held,
/// since an unbalanced release means two callers both believe they hold it.
///
/// The lock does not track which thread holds it.
/// Any thread may release a lock that another thread acquired.
///
/// To protect data with an RAII guard instead, use [`TryMutex`].
///
/// [`try_acquire`]: Self::try_acquire
/// [`release`]: Self::release
///
/// # Examples
///
/// ```
/// use try_mutex::NonBlockingLock;
///
/// let lock = NonBlockingLock::new();
///
/// assert!(lock.try_acquire());
/// // Contended attempts fail instead of waiting.
/// assert!(!lock.try_acquire());
///
/// lock.release();
/// assert!(lock.try_acquire());
/// ```
pub struct NonBlockingLock {
    held: AtomicBool,
}

impl NonBlockingLock {
    /// Creates a new lock in the unlocked state.
    #[inline]
    pub const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    /// Attempts to acquire the lock without waiting.
    ///
    /// Returns whether the attempt was successful.
    #[inline]
    pub fn try_acquire(&self) -> bool {
        let acquired = self
            .held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok();
        if !acquired {
            lock_trace!("try_acquire on a held NonBlockingLock");
        }
        acquired
    }

    /// Releases the lock.
    ///
    /// # Panics
    ///
    /// Panics if the lock is not held, i.e. on a double release or a release without a prior acquire.
    #[inline]
    pub fn release(&self) {
        if self
            .held
            .compare_exchange(true, false, Ordering::Release, Ordering::Relaxed)
            .is_err()
        {
            lock_error!("release on a NonBlockingLock that is not held");
            panic!("called `release` on a `NonBlockingLock` that is not held (double release)");
        }
    }

    /// Returns whether the lock is currently held.
    ///
    /// The result may be stale by the time it is observed.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.held.load(Ordering::Relaxed)
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
            .field("held", &self.is_locked())
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
        NonBlockingLock::is_locked(self)
    }
}

unsafe impl RawMutexFair for NonBlockingLock {
    #[inline]
    unsafe fn unlock_fair(&self) {
        self.release();
    }

    // Nobody ever waits, so there is no one to yield to.
    #[inline]
    unsafe fn bump(&self) {}
}

/// A [`lock_api::Mutex`] based on [`NonBlockingLock`].
///
/// # Examples
///
/// ```
/// use try_mutex::TryMutex;
///
/// static PENDING: TryMutex<u32> = TryMutex::new(0);
///
/// let mut guard = PENDING.try_lock().unwrap();
/// *guard += 1;
///
/// // This returns `None` instead of blocking.
/// assert!(PENDING.try_lock().is_none());
///
/// drop(guard);
/// assert_eq!(*PENDING.try_lock().unwrap(), 1);
/// ```
pub type TryMutex<T> = lock_api::Mutex<NonBlockingLock, T>;

/// A [`lock_api::MutexGuard`] based on [`NonBlockingLock`].
pub type TryMutexGuard<'a, T> = lock_api::MutexGuard<'a, NonBlockingLock, T>;

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::vec::Vec;

    use super::*;

    #[test]
    fn acquire_release() {
        let lock = NonBlockingLock::new();
        assert!(!lock.is_locked());

        assert!(lock.try_acquire());
        assert!(lock.is_locked());
        assert!(!lock.try_acquire());

        lock.release();
        assert!(!lock.is_locked());
        assert!(lock.try_acquire());
    }

    #[test]
    #[should_panic(expected = "not held")]
    fn double_release() {
        let lock = NonBlockingLock::new();
        assert!(lock.try_acquire());
        lock.release();
        lock.release();
    }

    #[test]
    #[should_panic(expected = "not held")]
    fn release_without_acquire() {
        let lock = NonBlockingLock::default();
        lock.release();
    }

    #[test]
    fn failed_acquire_has_no_effect() {
        let lock = NonBlockingLock::new();
        assert!(lock.try_acquire());
        for _ in 0..10 {
            assert!(!lock.try_acquire());
        }

        // A single release is enough to free it again.
        lock.release();
        assert!(!lock.is_locked());
    }

    #[test]
    fn many_cycles() {
        let lock = NonBlockingLock::new();
        for _ in 0..1000 {
            assert!(lock.try_acquire());
            lock.release();
        }
        assert!(!lock.is_locked());
    }

    #[test]
    fn contended_acquire() {
        const THREADS: usize = 16;

        for _ in 0..20 {
            let lock = Arc::new(NonBlockingLock::new());
            let barrier = Arc::new(Barrier::new(THREADS));

            let handles = (0..THREADS)
                .map(|_| {
                    let lock = lock.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        lock.try_acquire()
                    })
                })
                .collect::<Vec<_>>();

            let acquired = handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(|&acquired| acquired)
                .count();
            assert_eq!(acquired, 1);
            assert!(lock.is_locked());
        }
    }

    #[test]
    fn release_from_other_thread() {
        let lock = Arc::new(NonBlockingLock::new());
        assert!(lock.try_acquire());

        let releaser = lock.clone();
        thread::spawn(move || releaser.release()).join().unwrap();
        assert!(!lock.is_locked());

        let acquirer = lock.clone();
        assert!(thread::spawn(move || acquirer.try_acquire()).join().unwrap());
        assert!(!lock.try_acquire());
    }

    #[test]
    fn exclusive_counter() {
        const THREADS: usize = 8;
        const ROUNDS: usize = 1000;

        let mutex = Arc::new(TryMutex::new(0usize));
        let handles = (0..THREADS)
            .map(|_| {
                let mutex = mutex.clone();
                thread::spawn(move || {
                    let mut done = 0usize;
                    for _ in 0..ROUNDS {
                        if let Some(mut guard) = mutex.try_lock() {
                            *guard += 1;
                            done += 1;
                        }
                    }
                    done
                })
            })
            .collect::<Vec<_>>();

        let done: usize = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .sum();
        assert_eq!(*mutex.try_lock().unwrap(), done);
    }

    #[test]
    fn lock() {
        let mutex = TryMutex::new(42);
        let mut guard = mutex.lock();
        assert_eq!(*guard, 42);

        *guard += 1;
        drop(guard);
        let guard = mutex.lock();
        assert_eq!(*guard, 43);
    }

    #[test]
    #[should_panic(expected = "already held")]
    fn lock_panic() {
        let mutex = TryMutex::new(42);
        let _guard = mutex.lock();
        let _guard2 = mutex.lock();
    }

    #[test]
    fn try_lock() {
        let mutex = TryMutex::new(42);
        let mut guard = mutex.try_lock().unwrap();
        assert_eq!(*guard, 42);
        assert!(mutex.try_lock().is_none());

        *guard += 1;
        TryMutexGuard::unlock_fair(guard);
        let guard = mutex.try_lock().unwrap();
        assert_eq!(*guard, 43);
    }

    #[test]
    #[should_panic(expected = "not held")]
    fn force_unlock_unlocked() {
        let mutex = TryMutex::new(());
        unsafe { mutex.force_unlock() };
    }
}
