use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts live sessions, each one held by a [`SessionGuard`].
///
/// Clones share the same count.
#[derive(Debug, Default, Clone)]
pub struct SessionCounter(Arc<AtomicUsize>);

/// Keeps one session counted until dropped.
#[derive(Debug)]
#[must_use = "the session ends as soon as the guard is dropped"]
pub struct SessionGuard(Arc<AtomicUsize>);

impl SessionCounter {
    pub fn enter(&self) -> SessionGuard {
        self.0.fetch_add(1, Ordering::AcqRel);
        SessionGuard(self.0.clone())
    }

    pub fn active(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::SessionCounter;

    #[test]
    fn test_guards() {
        let counter = SessionCounter::default();
        let first = counter.enter();
        let second = counter.clone().enter();
        assert_eq!(counter.active(), 2);

        drop(first);
        assert_eq!(counter.active(), 1);
        drop(second);
        assert_eq!(counter.active(), 0);
    }

    #[test]
    fn test_guard_moved_across_threads() {
        let counter = SessionCounter::default();
        let guard = counter.enter();
        std::thread::spawn(move || drop(guard)).join().unwrap();
        assert_eq!(counter.active(), 0);
    }
}
