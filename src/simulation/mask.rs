//! Pixel occupancy masks for sprite collision.
//!
//! A [`Mask`] records which pixels of a sprite are solid. Two sprites collide
//! when any solid pixel of one lands on a solid pixel of the other, so birds
//! and pipes are compared pixel by pixel rather than by bounding box.

use serde::{Deserialize, Serialize};

use super::geometric_utils;

/// Solid-pixel grid of a sprite, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Creates an empty mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// Creates a mask with every pixel solid.
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Creates a mask by evaluating `solid(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, solid: impl Fn(u32, u32) -> bool) -> Self {
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(solid(x, y));
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Creates a mask from RGBA8 pixel data; pixels with alpha above
    /// `alpha_threshold` are solid.
    ///
    /// Returns `None` if `rgba` does not hold exactly `width * height` pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8], alpha_threshold: u8) -> Option<Self> {
        if rgba.len() != (width * height * 4) as usize {
            return None;
        }
        let bits = rgba
            .chunks_exact(4)
            .map(|px| px[3] > alpha_threshold)
            .collect();
        Some(Self {
            width,
            height,
            bits,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns whether the pixel is solid. Out-of-range pixels are empty.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Sets a pixel. Out-of-range pixels are ignored.
    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = solid;
        }
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Mirrors the mask top to bottom.
    pub fn flipped_vertical(&self) -> Self {
        let h = self.height;
        Self::from_fn(self.width, h, |x, y| self.get(x as i32, (h - 1 - y) as i32))
    }

    /// Rotates the mask counter-clockwise (as seen on screen) by `degrees`.
    ///
    /// The result is enlarged to hold the whole rotated sprite and keeps the
    /// source centre at its own centre. Sampling is nearest-neighbour.
    pub fn rotated(&self, degrees: f32) -> Self {
        if degrees.rem_euclid(360.0) == 0.0 {
            return self.clone();
        }

        let (new_w, new_h) = geometric_utils::rotated_bounds(self.width, self.height, degrees);
        let (sin, cos) = degrees.to_radians().sin_cos();

        let src_cx = self.width as f32 / 2.0;
        let src_cy = self.height as f32 / 2.0;
        let dst_cx = new_w as f32 / 2.0;
        let dst_cy = new_h as f32 / 2.0;

        Self::from_fn(new_w, new_h, |x, y| {
            // Inverse-map the destination pixel centre into the source.
            let dx = x as f32 + 0.5 - dst_cx;
            let dy = y as f32 + 0.5 - dst_cy;
            let sx = dx * cos - dy * sin + src_cx;
            let sy = dx * sin + dy * cos + src_cy;
            self.get(sx.floor() as i32, sy.floor() as i32)
        })
    }

    /// Finds the first solid pixel shared with `other` placed at `offset`
    /// relative to this mask's top-left corner.
    ///
    /// The returned point is in this mask's coordinates. Neither mask is modified.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (ox, oy) = offset;

        let x_start = ox.max(0);
        let y_start = oy.max(0);
        let x_end = (ox + other.width as i32).min(self.width as i32);
        let y_end = (oy + other.height as i32).min(self.height as i32);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x, y) && other.get(x - ox, y - oy) {
                    return Some((x, y));
                }
            }
        }
        None
    }

    /// Returns `true` if any solid pixel is shared with `other` at `offset`.
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }
}
