use std::cell::Cell;
use std::rc::Rc;

/// Marks one in-flight fetch as superseded once its effect is cleaned up.
///
/// The request itself keeps running; only its result is dropped, so a slow
/// response for old dependencies never overwrites a newer one.
#[derive(Clone, Default)]
pub struct FetchGuard {
    stale: Rc<Cell<bool>>,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_current(&self) -> bool {
        !self.stale.get()
    }

    pub fn cancel(&self) {
        self.stale.set(true);
    }

    /// Effect cleanup that supersedes this fetch
    pub fn canceller(&self) -> impl FnOnce() + 'static {
        let guard = self.clone();
        move || guard.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_guard_is_current() {
        assert!(FetchGuard::new().is_current());
    }

    #[test]
    fn test_cleanup_marks_every_clone_stale() {
        let guard = FetchGuard::new();
        let in_flight = guard.clone();
        let cleanup = guard.canceller();
        assert!(in_flight.is_current());
        cleanup();
        assert!(!in_flight.is_current());
        assert!(!guard.is_current());
    }

    #[test]
    fn test_later_fetch_wins_over_earlier_response() {
        // Dependencies change while the first request is pending
        let first = FetchGuard::new();
        let cleanup_first = first.canceller();
        cleanup_first();
        let second = FetchGuard::new();

        let mut shown = None;
        for (guard, result) in [(&second, "income"), (&first, "expense")] {
            if guard.is_current() {
                shown = Some(result);
            }
        }
        assert_eq!(shown, Some("income"));
    }
}
