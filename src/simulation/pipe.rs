//! Pipe obstacles.
//!
//! A pipe is a top and bottom pair scrolling left together with a fixed
//! vertical gap between them.

use std::borrow::Cow;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::footprint::{self, Footprint, Placed, Scrolling};
use super::params::Params;
use super::sprites::Sprites;

/// A top/bottom pipe pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Sequence number within the session (0 for the first pipe).
    pub id: usize,
    /// Left edge in pixels.
    pub x: f32,
    /// Height drawn at spawn; the upper edge of the gap.
    pub gap_height: u32,
    /// Upper edge of the gap (bottom of the top pipe).
    pub top: f32,
    /// Lower edge of the gap (top of the bottom pipe). `bottom - top == pipe_gap`.
    pub bottom: f32,
    /// Set once a bird has flown past.
    pub passed: bool,
}

impl Pipe {
    /// Creates a pipe at `x` with a gap height drawn uniformly from
    /// `params.gap_height_range`.
    pub fn new<R: Rng + ?Sized>(id: usize, x: f32, rng: &mut R, params: &Params) -> Self {
        let (min, max) = params.gap_height_range;
        let gap_height = rng.random_range(min..max);
        Self::with_gap_height(id, x, gap_height, params)
    }

    /// Creates a pipe with a known gap height.
    pub fn with_gap_height(id: usize, x: f32, gap_height: u32, params: &Params) -> Self {
        let top = gap_height as f32;
        Self {
            id,
            x,
            gap_height,
            top,
            bottom: top + params.pipe_gap,
            passed: false,
        }
    }

    /// Y of the top pipe sprite, which hangs above the gap.
    pub fn top_sprite_y(&self, params: &Params) -> f32 {
        self.top - params.pipe_height as f32
    }

    /// Right edge in pixels.
    pub fn right_edge(&self, params: &Params) -> f32 {
        self.x + params.pipe_width as f32
    }

    /// Returns `true` once the pipe has scrolled fully past the left edge.
    pub fn is_off_screen(&self, params: &Params) -> bool {
        self.right_edge(params) < 0.0
    }

    /// Pixel-accurate collision test against a bird.
    ///
    /// Pure: calling it repeatedly with the same state gives the same answer.
    pub fn collides_with(&self, bird: &Bird, sprites: &Sprites, params: &Params) -> bool {
        // A rotated bird never reaches further than half its diagonal from
        // its centre, so pipes outside that band cannot touch it.
        let (bw, bh) = (sprites.bird.width() as f32, sprites.bird.height() as f32);
        let reach = (bw * bw + bh * bh).sqrt() / 2.0 + 1.0;
        let center_x = bird.x + bw / 2.0;
        if self.right_edge(params) < center_x - reach || self.x > center_x + reach {
            return false;
        }

        footprint::collides(
            &bird.footprint(sprites, params),
            &self.footprint(sprites, params),
        )
    }
}

impl Footprint for Pipe {
    fn footprint<'a>(&self, sprites: &'a Sprites, params: &Params) -> Vec<Placed<'a>> {
        let x = self.x.round() as i32;
        vec![
            Placed {
                mask: Cow::Borrowed(&sprites.pipe_top),
                origin: (x, self.top_sprite_y(params).round() as i32),
            },
            Placed {
                mask: Cow::Borrowed(&sprites.pipe_bottom),
                origin: (x, self.bottom.round() as i32),
            },
        ]
    }
}

impl Scrolling for Pipe {
    fn advance(&mut self, speed: f32) {
        self.x -= speed;
    }
}
