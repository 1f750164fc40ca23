//! Geometric helpers for placing rotated sprites.

use geo::{BoundingRect, Rect, Rotate, coord};

/// Size of the axis-aligned box that holds a `width`×`height` sprite rotated
/// by `degrees` around its centre.
///
/// # Returns
///
/// `(width, height)` rounded up to whole pixels.
pub fn rotated_bounds(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    let rect = Rect::new(
        coord! { x: 0.0_f32, y: 0.0 },
        coord! { x: width as f32, y: height as f32 },
    );
    let rotated = rect.to_polygon().rotate_around_center(degrees);

    match rotated.bounding_rect() {
        // Trim float noise so 68.00001 does not round up to 69.
        Some(bounds) => (
            (bounds.width() - 1e-3).ceil().max(1.0) as u32,
            (bounds.height() - 1e-3).ceil().max(1.0) as u32,
        ),
        None => (width, height),
    }
}

/// Top-left pixel of a `width`×`height` box centred on `center`.
///
/// Used to re-centre a rotated sprite on the centre of the unrotated one.
pub fn centered_origin(center: (f32, f32), width: u32, height: u32) -> (i32, i32) {
    (
        (center.0 - width as f32 / 2.0).round() as i32,
        (center.1 - height as f32 / 2.0).round() as i32,
    )
}
