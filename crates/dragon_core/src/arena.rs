//! Playfield bounds and directional reach.
//!
//! The arena is owned by the window layer and handed to the simulation each
//! tick. Reach is directional: an attacker must face the defender, and the
//! hit zone is a strip of width `range` glued to the defender's near side.

use serde::{Deserialize, Serialize};

use crate::actor::{Actor, Facing};
use crate::math::Rect;

/// Width of the reach strip beside the defender.
pub const ATTACK_RANGE: i32 = 80;

/// Default playfield width.
pub const DEFAULT_ARENA_WIDTH: i32 = 1200;

/// Default playfield height.
pub const DEFAULT_ARENA_HEIGHT: i32 = 700;

/// Playable surface dimensions, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arena {
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT)
    }
}

impl Arena {
    /// Create an arena of the given size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True if `[x, x + extent]` fits inside `[0, width]`.
    ///
    /// A negative extent never fits.
    #[must_use]
    pub const fn contains_span_x(&self, x: i32, extent: i32) -> bool {
        span_fits(x, extent, self.width)
    }

    /// True if `[y, y + extent]` fits inside `[0, height]`.
    ///
    /// A negative extent never fits.
    #[must_use]
    pub const fn contains_span_y(&self, y: i32, extent: i32) -> bool {
        span_fits(y, extent, self.height)
    }

    /// True if the rectangle lies entirely within the arena.
    #[must_use]
    pub const fn contains(&self, rect: &Rect) -> bool {
        self.contains_span_x(rect.x, rect.width) && self.contains_span_y(rect.y, rect.height)
    }
}

// Summed in i64 so extents near `i32::MAX` cannot overflow.
const fn span_fits(start: i32, extent: i32, limit: i32) -> bool {
    start >= 0 && extent >= 0 && start as i64 + extent as i64 <= limit as i64
}

/// Reach strip the attacker must overlap to hit the defender.
///
/// Returns `None` when the attacker faces away from the defender (or they
/// share the same x), in which case no hit is possible at any distance.
#[must_use]
pub fn attack_reach(attacker: &Actor, defender: &Actor, range: i32) -> Option<Rect> {
    let attacker_x = attacker.position().x;
    let target = defender.bounding_box();

    match attacker.facing() {
        Facing::Right if attacker_x < target.x => {
            Some(Rect::new(
                target.x.saturating_sub(range),
                target.y,
                range,
                target.height,
            ))
        }
        Facing::Left if attacker_x > target.x => Some(Rect::new(
            target.x.saturating_add(target.width),
            target.y,
            range,
            target.height,
        )),
        _ => None,
    }
}

/// True if the attacker faces the defender and overlaps its reach strip.
#[must_use]
pub fn in_attack_range(attacker: &Actor, defender: &Actor, range: i32) -> bool {
    attack_reach(attacker, defender, range)
        .is_some_and(|reach| attacker.bounding_box().intersects(&reach))
}
