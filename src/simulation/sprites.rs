//! Collision masks for the game's sprites.
//!
//! The masks are generated procedurally at the sizes given in [`Params`] so
//! the simulation runs without any image assets. Real sprite art can be
//! plugged in through [`Mask::from_rgba`].

use super::mask::Mask;
use super::params::Params;

/// Collision masks for the bird and both pipe orientations.
#[derive(Debug, Clone)]
pub struct Sprites {
    /// Bird mask, unrotated.
    pub bird: Mask,
    /// Pipe hanging from the top of the screen (opening at the bottom).
    pub pipe_top: Mask,
    /// Pipe standing on the ground (opening at the top).
    pub pipe_bottom: Mask,
}

impl Sprites {
    /// Builds the default masks for the sprite sizes in `params`.
    pub fn new(params: &Params) -> Self {
        let pipe_bottom = pipe_mask(params.pipe_width, params.pipe_height);
        Self {
            bird: bird_mask(params.bird_width, params.bird_height),
            pipe_top: pipe_bottom.flipped_vertical(),
            pipe_bottom,
        }
    }

    /// Builds a sprite set from custom masks. The top pipe is derived by
    /// flipping the bottom one.
    pub fn from_masks(bird: Mask, pipe_bottom: Mask) -> Self {
        Self {
            bird,
            pipe_top: pipe_bottom.flipped_vertical(),
            pipe_bottom,
        }
    }
}

/// An elliptical body with a beak, leaving the corners transparent.
fn bird_mask(width: u32, height: u32) -> Mask {
    let rx = width as f32 * 0.42;
    let ry = height as f32 / 2.0;
    let cx = rx;
    let cy = ry;
    let beak_start = width as f32 * 0.75;

    Mask::from_fn(width, height, |x, y| {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;

        let nx = (px - cx) / rx;
        let ny = (py - cy) / ry;
        let in_body = nx * nx + ny * ny <= 1.0;

        let in_beak = px >= beak_start && (py - height as f32 * 0.6).abs() <= height as f32 * 0.15;

        in_body || in_beak
    })
}

/// A pipe shaft with a wider lip at the open end (the top row).
fn pipe_mask(width: u32, height: u32) -> Mask {
    let lip_height = (height / 20).max(1);
    let inset = (width / 26).max(1);

    Mask::from_fn(width, height, |x, y| {
        y < lip_height || (x >= inset && x < width.saturating_sub(inset))
    })
}
