//! Explicit commit-or-rollback guard.
//!
//! A [`ScopedRollback`] holds a rollback action until it is either
//! dismissed (commit) or asked to roll back. Both are consuming calls, so the
//! action can run at most once. Dropping a guard that is still armed never runs
//! the action; it is logged as an error (and fails a debug assertion) because
//! some code path forgot to decide.

pub struct ScopedRollback<F> {
    action: Option<F>,
}

impl<F> ScopedRollback<F> {
    pub fn new(action: F) -> Self {
        Self {
            action: Some(action),
        }
    }

    pub fn is_armed(&self) -> bool {
        self.action.is_some()
    }

    /// Commit: the rollback action is discarded without running.
    pub fn dismiss(mut self) {
        self.action = None;
    }

    /// Run the rollback action with `args`.
    pub fn rollback<A>(mut self, args: A)
    where
        F: FnOnce(A),
    {
        if let Some(action) = self.action.take() {
            action(args);
        }
    }
}

impl<F> Drop for ScopedRollback<F> {
    fn drop(&mut self) {
        if self.action.is_some() && !std::thread::panicking() {
            tracing::error!("rollback guard dropped without being dismissed or rolled back");
            debug_assert!(
                false,
                "rollback guard dropped without being dismissed or rolled back"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::panic::AssertUnwindSafe;

    #[test]
    fn test_dismiss_skips_action() {
        let calls = Cell::new(0);
        let guard = ScopedRollback::new(|()| calls.set(calls.get() + 1));
        assert!(guard.is_armed());
        guard.dismiss();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_rollback_runs_once() {
        let mut calls = 0;
        let guard = ScopedRollback::new(|counter: &mut i32| *counter += 1);
        guard.rollback(&mut calls);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_rollback_with_tuple_args() {
        let mut log: Vec<&str> = Vec::new();
        let mut total = 0;
        let guard = ScopedRollback::new(|(log, total): (&mut Vec<&str>, &mut i32)| {
            log.push("rolled back");
            *total -= 1;
        });
        guard.rollback((&mut log, &mut total));
        assert_eq!(log, vec!["rolled back"]);
        assert_eq!(total, -1);
    }

    #[test]
    fn test_dropped_guard_does_not_run() {
        let calls = Cell::new(0);
        let dropped = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = ScopedRollback::new(|()| calls.set(calls.get() + 1));
        }));
        // undecided guards are reported loudly in debug builds
        assert_eq!(dropped.is_err(), cfg!(debug_assertions));
        assert_eq!(calls.get(), 0);
    }
}
