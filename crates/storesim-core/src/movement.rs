//! One step of the movement algorithm with local collision avoidance.
//!
//! A step adds the per-step delta to the current position. If any other
//! customer stands closer than `min_separation` to the proposed position,
//! a small random jitter is applied on each axis. The result is clamped to
//! the canvas. The caller holds the roster lock for the whole step and
//! commits the returned position.

use std::time::Duration;

use rand::Rng;
use storesim_types::Position;

use crate::geometry::{self, Bounds};

/// Runtime parameters of the movement algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementParams {
    /// Discrete steps per walk.
    pub steps: u32,
    /// Delay before each step.
    pub step_delay: Duration,
    /// Neighbour distance that triggers a jitter.
    pub min_separation: f64,
    /// Maximum jitter per axis.
    pub jitter: i32,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            steps: 50,
            step_delay: Duration::from_millis(50),
            min_separation: 30.0,
            jitter: 2,
        }
    }
}

/// Result of computing one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// `current + delta`, before jitter and clamping.
    pub proposed: Position,
    /// The position to commit.
    pub committed: Position,
    /// Whether a neighbour was too close and jitter was applied.
    pub jittered: bool,
}

/// Compute the next position.
///
/// `others` are the positions of every other customer in the roster.
pub fn advance<R, I>(
    current: Position,
    delta: Position,
    others: I,
    params: &MovementParams,
    bounds: Bounds,
    rng: &mut R,
) -> StepOutcome
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = Position>,
{
    let proposed = current.saturating_add(delta);
    let crowded = others
        .into_iter()
        .any(|other| geometry::distance(proposed, other) < params.min_separation);

    let jittered = crowded && params.jitter > 0;
    let nudged = if jittered {
        proposed.saturating_add(jitter(params.jitter, rng))
    } else {
        proposed
    };

    StepOutcome {
        proposed,
        committed: bounds.clamp(nudged),
        jittered,
    }
}

/// A random per-axis offset in `-max..=max`, never `(0, 0)`.
fn jitter<R: Rng + ?Sized>(max: i32, rng: &mut R) -> Position {
    let max = max.max(1);
    let low = max.saturating_neg();
    loop {
        let offset = Position::new(rng.random_range(low..=max), rng.random_range(low..=max));
        if offset != Position::default() {
            return offset;
        }
    }
}
