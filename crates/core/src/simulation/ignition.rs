//! Initial fire seeding
//!
//! Produces the set of positions whose vegetation starts `Burning`. Cells
//! in the set that end up without vegetation simply do not ignite.

use crate::config::{FirePosition, IgnitionMode};
use crate::core_types::Position;
use rand::Rng;
use rustc_hash::FxHashSet;

/// Fewest and most random ignition points
pub const RANDOM_FIRES: std::ops::RangeInclusive<u32> = 1..=7;

/// Half side of the centered `Middle` square
pub const MIDDLE_HALF_SIDE: i32 = 10;

/// Positions to ignite at initialization.
///
/// `+y` is north, so `Top` is the row `y = height - 1`.
pub fn ignition_points<R: Rng + ?Sized>(
    mode: IgnitionMode,
    width: i32,
    height: i32,
    rng: &mut R,
) -> FxHashSet<Position> {
    match mode {
        IgnitionMode::Random => {
            let count = rng.random_range(RANDOM_FIRES);
            (0..count)
                .map(|_| Position::new(rng.random_range(0..width), rng.random_range(0..height)))
                .collect()
        }
        IgnitionMode::Directional(edge) => band(edge, width, height).collect(),
    }
}

fn band(edge: FirePosition, width: i32, height: i32) -> Box<dyn Iterator<Item = Position>> {
    match edge {
        FirePosition::Left => Box::new((0..height).map(|y| Position::new(0, y))),
        FirePosition::Right => Box::new((0..height).map(move |y| Position::new(width - 1, y))),
        FirePosition::Bottom => Box::new((0..width).map(|x| Position::new(x, 0))),
        FirePosition::Top => Box::new((0..width).map(move |x| Position::new(x, height - 1))),
        FirePosition::Middle => {
            let xs = centered(width);
            let ys = centered(height);
            Box::new(ys.flat_map(move |y| xs.clone().map(move |x| Position::new(x, y))))
        }
    }
}

/// `[n/2 - 10, n/2 + 10)` clipped to `[0, n)`
fn centered(n: i32) -> std::ops::Range<i32> {
    let half = n / 2;
    (half - MIDDLE_HALF_SIDE).max(0)..(half + MIDDLE_HALF_SIDE).min(n)
}
