//! Lock-free activity counters.
//!
//! The store tracks how many customer workers are running and how many
//! dispatchers are attached to the intake queue. Both are plain atomics;
//! an [`ActivityGuard`] ties an increment to a scope so the decrement
//! happens on every exit path, including cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A non-negative gauge backed by an [`AtomicU64`].
#[derive(Debug, Default)]
pub struct ActivityCounter(AtomicU64);

impl ActivityCounter {
    /// Create a counter at zero.
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Current value.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Increment by one, saturating at `u64::MAX`.
    pub fn increment(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| Some(n.saturating_add(1)));
    }

    /// Decrement by one. A counter at zero stays at zero.
    pub fn decrement(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    /// Increment now and decrement when the returned guard drops.
    pub fn enter(self: &Arc<Self>) -> ActivityGuard {
        self.increment();
        ActivityGuard {
            counter: Arc::clone(self),
        }
    }
}

/// Decrements its counter on drop.
#[derive(Debug)]
pub struct ActivityGuard {
    counter: Arc<ActivityCounter>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.counter.decrement();
    }
}
