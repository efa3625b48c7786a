//! Screen <-> normalized coordinate conversion.
//!
//! Strokes are stored as fractions of the canvas width/height so they survive
//! any resize of the page view. Normalized values are never clamped: ink drawn
//! past the page edge keeps its out-of-range coordinates.

use kurbo::{Point, Size};

/// Default change (in screen units) a canvas dimension must exceed before the
/// displayed ink is rebuilt.
pub const DEFAULT_RESIZE_TOLERANCE: f64 = 0.5;

/// Convert a screen point into normalized canvas space.
pub fn normalize(point: Point, size: Size) -> Point {
    Point::new(point.x / size.width, point.y / size.height)
}

/// Convert a normalized point back into screen space.
pub fn denormalize(point: Point, size: Size) -> Point {
    Point::new(point.x * size.width, point.y * size.height)
}

/// Whether both dimensions are finite and strictly positive.
pub fn is_valid_size(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// Whether `new` differs from `old` by more than `tolerance` in either dimension.
pub fn size_changed(old: Size, new: Size, tolerance: f64) -> bool {
    (old.width - new.width).abs() > tolerance || (old.height - new.height).abs() > tolerance
}
