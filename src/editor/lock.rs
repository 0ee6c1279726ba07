//! Injected capability for host interaction state suspended during a drag
//! (map panning, cursor style).

/// Host-side interaction state that must be suspended while a drag is active
/// and restored when it ends, however it ends.
pub trait InteractionLock {
    fn acquire(&self);
    fn release(&self);
}

/// Scoped acquisition of an [InteractionLock]. Release happens on drop, so it
/// is guaranteed on every drag-exit path — normal pointer-up, pointer-cancel,
/// and early returns alike.
pub struct LockGuard<'a> {
    lock: &'a dyn InteractionLock,
}

impl<'a> LockGuard<'a> {
    pub fn acquire(lock: &'a dyn InteractionLock) -> Self {
        lock.acquire();
        LockGuard { lock }
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingLock {
        acquired: Cell<u32>,
        released: Cell<u32>,
    }

    impl InteractionLock for CountingLock {
        fn acquire(&self) {
            self.acquired.set(self.acquired.get() + 1);
        }
        fn release(&self) {
            self.released.set(self.released.get() + 1);
        }
    }

    #[test]
    fn releases_on_drop() {
        let lock = CountingLock {
            acquired: Cell::new(0),
            released: Cell::new(0),
        };
        {
            let _guard = LockGuard::acquire(&lock);
            assert_eq!(lock.acquired.get(), 1);
            assert_eq!(lock.released.get(), 0);
        }
        assert_eq!(lock.released.get(), 1);
    }

    #[test]
    fn releases_on_early_exit() {
        let lock = CountingLock {
            acquired: Cell::new(0),
            released: Cell::new(0),
        };
        let run = || -> Option<()> {
            let _guard = LockGuard::acquire(&lock);
            None?;
            Some(())
        };
        assert!(run().is_none());
        assert_eq!(lock.released.get(), 1);
    }
}
