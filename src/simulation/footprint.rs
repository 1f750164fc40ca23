//! Traits shared by the bird, the pipes and the ground.
//!
//! [`Footprint`] is the "occupied pixels" capability used for collision and
//! [`Scrolling`] is the left-scrolling motion shared by pipes and ground.

use std::borrow::Cow;

use super::mask::Mask;
use super::params::Params;
use super::sprites::Sprites;

/// A mask placed at an absolute pixel position.
///
/// Masks are borrowed from [`Sprites`] when used as-is and owned when they
/// were computed for the current state (the bird's rotated mask).
#[derive(Debug, Clone)]
pub struct Placed<'a> {
    /// The solid pixels.
    pub mask: Cow<'a, Mask>,
    /// Top-left corner in screen pixels.
    pub origin: (i32, i32),
}

/// Entities that occupy solid pixels on screen.
///
/// Any type that implements this trait can report where its sprites sit, so
/// any two of them can be tested for pixel overlap with [`collides`].
pub trait Footprint {
    /// Returns the entity's masks at their current screen positions.
    fn footprint<'a>(&self, sprites: &'a Sprites, params: &Params) -> Vec<Placed<'a>>;
}

/// Entities that move left at the shared scroll speed.
pub trait Scrolling {
    /// Moves the entity left by `speed` pixels.
    fn advance(&mut self, speed: f32);
}

/// Returns `true` if any solid pixel of `a` overlaps any solid pixel of `b`.
pub fn collides(a: &[Placed<'_>], b: &[Placed<'_>]) -> bool {
    a.iter().any(|pa| {
        b.iter().any(|pb| {
            let offset = (pb.origin.0 - pa.origin.0, pb.origin.1 - pa.origin.1);
            pa.mask.overlaps(&pb.mask, offset)
        })
    })
}
