use std::sync::{Arc, Mutex, MutexGuard};

use crate::system::error::Result;

/// Counted init/teardown cell for process-wide backends (GPU context, audio device)
///
/// The payload is created exactly once when the live count goes 0 -> 1 &
/// destroyed exactly once when it goes 1 -> 0, no matter how many resources
/// or threads acquire it. Counters are inspectable so the invariant can be
/// verified directly
pub(crate) struct SharedLifecycle<T> {
    state: Mutex<State<T>>,
}

struct State<T> {
    count: usize,
    value: Option<Arc<T>>,
    inits: u64,
    teardowns: u64,
}

impl<T> SharedLifecycle<T> {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(State {
                count: 0,
                value: None,
                inits: 0,
                teardowns: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // A poisoned lock only means another thread panicked mid-transition;
        // the count/value pair is still coherent
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Increments the live count, running `init` on the 0 -> 1 transition
    ///
    /// If `init` fails the count is left untouched, so a later acquire
    /// retries initialization
    pub fn acquire(&self, init: impl FnOnce() -> Result<T>) -> Result<Arc<T>> {
        let mut state = self.lock();
        let value = match &state.value {
            Some(value) => value.clone(),
            None => {
                let value = Arc::new(init()?);
                state.value = Some(value.clone());
                state.inits += 1;
                value
            }
        };
        state.count += 1;
        Ok(value)
    }

    /// Decrements the live count, tearing down on the 1 -> 0 transition
    ///
    /// Handles that still hold a clone of the payload `Arc` keep it alive
    /// until they drop; the teardown counter records the logical transition
    pub fn release(&self) {
        let mut state = self.lock();
        debug_assert!(state.count > 0, "release without matching acquire");
        state.count = state.count.saturating_sub(1);
        if state.count == 0 {
            state.value = None;
            state.teardowns += 1;
        }
    }

    /// Number of handles currently alive
    pub fn live(&self) -> usize {
        self.lock().count
    }

    /// (inits, teardowns) since process start
    pub fn counters(&self) -> (u64, u64) {
        let state = self.lock();
        (state.inits, state.teardowns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn init_and_teardown_happen_once_for_many_handles() {
        let cell = SharedLifecycle::<u32>::new();
        let a = cell.acquire(|| Ok(7)).unwrap();
        let b = cell.acquire(|| panic!("must not re-init")).unwrap();
        assert_eq!((*a, *b), (7, 7));
        assert_eq!(cell.live(), 2);

        cell.release();
        assert_eq!(cell.counters(), (1, 0));
        cell.release();
        assert_eq!(cell.counters(), (1, 1));
        assert_eq!(cell.live(), 0);
    }

    #[test]
    fn reinitializes_after_full_teardown() {
        let cell = SharedLifecycle::<u32>::new();
        let _ = cell.acquire(|| Ok(1)).unwrap();
        cell.release();
        let v = cell.acquire(|| Ok(2)).unwrap();
        assert_eq!(*v, 2);
        cell.release();
        assert_eq!(cell.counters(), (2, 2));
    }

    #[test]
    fn failed_init_leaves_count_at_zero() {
        let cell = SharedLifecycle::<u32>::new();
        let err = cell.acquire(|| Err(crate::system::Error::AdapterNotFound));
        assert!(err.is_err());
        assert_eq!(cell.live(), 0);
        assert_eq!(cell.counters(), (0, 0));

        // next acquire retries & succeeds
        let v = cell.acquire(|| Ok(3)).unwrap();
        assert_eq!(*v, 3);
        cell.release();
    }

    #[test]
    fn concurrent_acquire_release_counts_one_init_one_teardown() {
        // n threads construct concurrently, then all destroy: exactly one
        // underlying init & one teardown must be observed
        static CELL: SharedLifecycle<usize> = SharedLifecycle::new();
        let n = 8;
        let start = Arc::new(Barrier::new(n));
        let acquired = Arc::new(Barrier::new(n));

        let handles: Vec<_> = (0..n)
            .map(|_| {
                let start = start.clone();
                let acquired = acquired.clone();
                thread::spawn(move || {
                    start.wait();
                    let payload = CELL.acquire(|| Ok(42)).unwrap();
                    assert_eq!(*payload, 42);
                    acquired.wait();
                    CELL.release();
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(CELL.counters(), (1, 1));
        assert_eq!(CELL.live(), 0);
    }
}
