//! Canvas geometry: bounds, distances, and per-step deltas.

use storesim_types::Position;

/// The drawable area of the store. Both ranges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Maximum x coordinate.
    pub width: i32,
    /// Maximum y coordinate.
    pub height: i32,
}

impl Bounds {
    /// Create bounds. Negative extents are treated as zero.
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Clamp a position into `0..=width` by `0..=height`.
    pub const fn clamp(self, position: Position) -> Position {
        Position::new(
            clamp_axis(position.x, self.width),
            clamp_axis(position.y, self.height),
        )
    }

    /// Whether a position lies inside the bounds.
    pub const fn contains(self, position: Position) -> bool {
        position.x >= 0 && position.x <= self.width && position.y >= 0 && position.y <= self.height
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

const fn clamp_axis(value: i32, max: i32) -> i32 {
    if value < 0 {
        0
    } else if value > max {
        max
    } else {
        value
    }
}

/// Euclidean distance between two positions.
pub fn distance(a: Position, b: Position) -> f64 {
    let dx = f64::from(b.x) - f64::from(a.x);
    let dy = f64::from(b.y) - f64::from(a.y);
    dx.hypot(dy)
}

/// The per-step delta for walking from `from` to `to` in `steps` steps.
///
/// Each component is the total displacement divided by `steps`, rounded
/// half away from zero. Accumulating this delta does not necessarily land
/// exactly on `to`.
pub fn step_delta(from: Position, to: Position, steps: u32) -> Position {
    let steps = i64::from(steps.max(1));
    let dx = i64::from(to.x).saturating_sub(i64::from(from.x));
    let dy = i64::from(to.y).saturating_sub(i64::from(from.y));
    Position::new(
        saturate_i32(rounded_div(dx, steps)),
        saturate_i32(rounded_div(dy, steps)),
    )
}

/// Integer division rounded half away from zero. A non-positive
/// denominator returns the numerator unchanged.
fn rounded_div(numerator: i64, denominator: i64) -> i64 {
    if denominator <= 0 {
        return numerator;
    }
    let quotient = numerator.checked_div(denominator).unwrap_or(numerator);
    let remainder = numerator.checked_rem(denominator).unwrap_or(0);
    let twice = remainder.saturating_abs().saturating_mul(2);
    if twice >= denominator {
        quotient.saturating_add(numerator.signum())
    } else {
        quotient
    }
}

fn saturate_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
