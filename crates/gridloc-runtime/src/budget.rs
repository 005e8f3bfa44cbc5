//! [`ConvergenceBudget`] – bounds on the localization loop.
//!
//! A robot whose observations never single out one pose (a symmetric map, a
//! misread color, a wheel that slips every segment) would otherwise drive
//! forever.  The budget caps the number of filter iterations and, optionally,
//! the wall-clock time since the loop started.
//!
//! # Example
//!
//! ```rust
//! use gridloc_runtime::budget::{BudgetStatus, ConvergenceBudget};
//!
//! let mut budget = ConvergenceBudget::new(2);
//! budget.start();
//!
//! assert_eq!(budget.check(), BudgetStatus::Within);
//! budget.record();
//! budget.record();
//! assert_eq!(budget.check(), BudgetStatus::IterationsExhausted);
//!
//! // Restarting clears the count.
//! budget.start();
//! assert_eq!(budget.check(), BudgetStatus::Within);
//! ```

use std::time::{Duration, Instant};

/// Result of [`ConvergenceBudget::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// Another iteration may run.
    Within,
    /// The iteration cap has been reached.
    IterationsExhausted,
    /// The wall-clock timeout has elapsed.
    TimedOut,
}

/// Iteration and time limits for one localization run.
#[derive(Debug, Clone)]
pub struct ConvergenceBudget {
    max_iterations: usize,
    timeout: Option<Duration>,
    iterations: usize,
    started: Option<Instant>,
}

impl ConvergenceBudget {
    /// Allow at most `max_iterations` filter iterations.
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            timeout: None,
            iterations: 0,
            started: None,
        }
    }

    /// Also stop once `timeout` has elapsed since [`start`][Self::start].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Begin (or restart) the clock and clear the iteration count.
    pub fn start(&mut self) {
        self.iterations = 0;
        self.started = Some(Instant::now());
    }

    /// Record one completed iteration.
    pub fn record(&mut self) {
        self.iterations += 1;
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Whether another iteration may run.  The iteration cap is checked
    /// first.  The clock only runs after [`start`][Self::start].
    pub fn check(&self) -> BudgetStatus {
        if self.iterations >= self.max_iterations {
            return BudgetStatus::IterationsExhausted;
        }
        match (self.timeout, self.started) {
            (Some(timeout), Some(started)) if started.elapsed() > timeout => BudgetStatus::TimedOut,
            _ => BudgetStatus::Within,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn within_budget_until_cap() {
        let mut budget = ConvergenceBudget::new(3);
        budget.start();
        for _ in 0..3 {
            assert_eq!(budget.check(), BudgetStatus::Within);
            budget.record();
        }
        assert_eq!(budget.check(), BudgetStatus::IterationsExhausted);
        assert_eq!(budget.iterations(), 3);
    }

    #[test]
    fn zero_cap_is_exhausted_immediately() {
        let budget = ConvergenceBudget::new(0);
        assert_eq!(budget.check(), BudgetStatus::IterationsExhausted);
    }

    #[test]
    fn timeout_trips_after_elapsed() {
        let mut budget = ConvergenceBudget::new(100).with_timeout(Duration::from_millis(10));
        budget.start();
        assert_eq!(budget.check(), BudgetStatus::Within);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(budget.check(), BudgetStatus::TimedOut);
    }

    #[test]
    fn timeout_needs_a_started_clock() {
        let budget = ConvergenceBudget::new(100).with_timeout(Duration::ZERO);
        assert_eq!(budget.check(), BudgetStatus::Within);
    }

    #[test]
    fn start_resets_count() {
        let mut budget = ConvergenceBudget::new(1);
        budget.start();
        budget.record();
        assert_eq!(budget.check(), BudgetStatus::IterationsExhausted);
        budget.start();
        assert_eq!(budget.iterations(), 0);
        assert_eq!(budget.check(), BudgetStatus::Within);
    }
}
