use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tranship_core::traits::StoppingCriterion;

#[derive(Debug, Clone, Copy)]
pub struct TimeLimit {
    limit: Duration,
}

impl TimeLimit {
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }
}

impl StoppingCriterion for TimeLimit {
    fn name(&self) -> &str {
        "time-limit"
    }

    fn should_stop(&self, _pivots: usize, elapsed: Duration) -> Option<String> {
        (elapsed >= self.limit).then(|| format!("time limit of {:?} reached", self.limit))
    }
}

#[derive(Debug, Clone)]
pub struct InterruptFlag {
    flag: Arc<AtomicBool>,
}

impl InterruptFlag {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }
}

impl StoppingCriterion for InterruptFlag {
    fn name(&self) -> &str {
        "interrupt"
    }

    fn should_stop(&self, _pivots: usize, _elapsed: Duration) -> Option<String> {
        self.flag
            .load(Ordering::Relaxed)
            .then(|| "interrupt signal received".to_string())
    }
}
