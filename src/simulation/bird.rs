//! Bird kinematics.
//!
//! Vertical motion is recomputed each tick from the number of ticks since the
//! last impulse rather than integrated, which gives the arcade feel of the
//! reference game. Tilt is derived from the motion and exists for drawing and
//! for the rotation-adjusted collision footprint.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::footprint::{Footprint, Placed};
use super::geometric_utils;
use super::params::Params;
use super::sprites::Sprites;

/// A bird's physical state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Horizontal position, fixed after spawn.
    pub x: f32,
    /// Vertical position of the sprite's top edge (screen coordinates, y down).
    pub y: f32,
    /// Velocity set by the last impulse.
    pub velocity: f32,
    /// Ticks since the last impulse.
    pub tick_count: u32,
    /// Tilt in degrees, positive is nose up. Always within `[min_rotation, max_rotation]`.
    pub tilt: f32,
    /// Height at the last impulse (or at spawn).
    pub jump_origin_y: f32,
}

impl Bird {
    /// Creates a bird at rest, level.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            velocity: 0.0,
            tick_count: 0,
            tilt: 0.0,
            jump_origin_y: y,
        }
    }

    /// Creates a bird at the spawn point from the parameters.
    pub fn spawn(params: &Params) -> Self {
        Self::new(params.bird_start_x, params.bird_start_y)
    }

    /// Applies an upward impulse and restarts the motion curve.
    pub fn jump(&mut self, params: &Params) {
        self.velocity = params.jump_velocity;
        self.tick_count = 0;
        self.jump_origin_y = self.y;
    }

    /// Displacement for the current tick count, after clamping and bias.
    pub fn displacement(&self, params: &Params) -> f32 {
        let t = self.tick_count as f32;
        let mut d = self.velocity * t + params.gravity * t * t;

        if d >= params.max_displacement {
            d = params.max_displacement;
        }
        if d >= 0.0 {
            d += params.descent_bias;
        }
        d
    }

    /// Advances one tick and returns the displacement applied.
    pub fn advance(&mut self, params: &Params) -> f32 {
        self.tick_count += 1;

        let d = self.displacement(params);
        self.y += d;

        if d < 0.0 || self.y < self.jump_origin_y + params.climb_buffer {
            if self.tilt < params.max_rotation {
                self.tilt = params.max_rotation;
            }
        } else {
            self.tilt = (self.tilt - params.rotation_velocity).max(params.min_rotation);
        }

        d
    }

    /// Centre of the unrotated sprite.
    pub fn center(&self, params: &Params) -> (f32, f32) {
        (
            self.x + params.bird_width as f32 / 2.0,
            self.y + params.bird_height as f32 / 2.0,
        )
    }
}

impl Footprint for Bird {
    /// The bird's mask rotated by its tilt and re-centred on the centre of
    /// the unrotated sprite, with y rounded to the nearest pixel.
    fn footprint<'a>(&self, sprites: &'a Sprites, _params: &Params) -> Vec<Placed<'a>> {
        let base = &sprites.bird;
        let center = (
            self.x + base.width() as f32 / 2.0,
            self.y.round() + base.height() as f32 / 2.0,
        );

        let mask = if self.tilt == 0.0 {
            Cow::Borrowed(base)
        } else {
            Cow::Owned(base.rotated(self.tilt))
        };
        let origin = geometric_utils::centered_origin(center, mask.width(), mask.height());

        vec![Placed { mask, origin }]
    }
}
