//! Scrolling ground.

use serde::{Deserialize, Serialize};

use super::footprint::Scrolling;
use super::params::Params;

/// Two ground tiles that scroll left and leapfrog each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    /// Top of the ground tiles.
    pub y: f32,
    /// Left edge of the first tile.
    pub x1: f32,
    /// Left edge of the second tile.
    pub x2: f32,
    /// Width of one tile.
    pub width: f32,
}

impl Ground {
    /// Creates the ground with the tiles side by side.
    pub fn new(params: &Params) -> Self {
        Self {
            y: params.ground_y,
            x1: 0.0,
            x2: params.ground_width,
            width: params.ground_width,
        }
    }
}

impl Scrolling for Ground {
    fn advance(&mut self, speed: f32) {
        self.x1 -= speed;
        self.x2 -= speed;

        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }
}
