//! Pointer events forwarded by the host UI layer.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Stable identity of a pointer (mouse, pen, or one touch contact) for the
/// duration of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerId(pub u32);

/// Device details attached to a pointer event.
///
/// Carried through untouched; the engine never reinterprets these bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerDevice {
    /// Button pressed / contact made.
    pub in_contact: bool,
    /// Pen eraser tip (or barrel eraser button) active.
    pub eraser_tip: bool,
}

/// Pointer event type for unified mouse/touch/pen handling.
/// Positions are in screen coordinates of the ink canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        pointer: PointerId,
        position: Point,
        device: PointerDevice,
    },
    Move {
        pointer: PointerId,
        position: Point,
        device: PointerDevice,
    },
    Up {
        pointer: PointerId,
        position: Point,
        device: PointerDevice,
    },
    /// The canvas lost pointer capture; treated exactly like `Up`.
    CaptureLost { pointer: PointerId },
}

impl PointerEvent {
    /// Contact-down event with default device bits.
    pub fn down(pointer: u32, x: f64, y: f64) -> Self {
        PointerEvent::Down {
            pointer: PointerId(pointer),
            position: Point::new(x, y),
            device: PointerDevice {
                in_contact: true,
                eraser_tip: false,
            },
        }
    }

    /// Contact-move event with default device bits.
    pub fn moved(pointer: u32, x: f64, y: f64) -> Self {
        PointerEvent::Move {
            pointer: PointerId(pointer),
            position: Point::new(x, y),
            device: PointerDevice {
                in_contact: true,
                eraser_tip: false,
            },
        }
    }

    /// Release event with default device bits.
    pub fn up(pointer: u32, x: f64, y: f64) -> Self {
        PointerEvent::Up {
            pointer: PointerId(pointer),
            position: Point::new(x, y),
            device: PointerDevice::default(),
        }
    }

    pub fn capture_lost(pointer: u32) -> Self {
        PointerEvent::CaptureLost {
            pointer: PointerId(pointer),
        }
    }

    pub fn pointer(&self) -> PointerId {
        match self {
            PointerEvent::Down { pointer, .. }
            | PointerEvent::Move { pointer, .. }
            | PointerEvent::Up { pointer, .. }
            | PointerEvent::CaptureLost { pointer } => *pointer,
        }
    }

    /// Screen position, if the event carries one.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => Some(*position),
            PointerEvent::CaptureLost { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let down = PointerEvent::down(7, 1.0, 2.0);
        assert_eq!(down.pointer(), PointerId(7));
        assert_eq!(down.position(), Some(Point::new(1.0, 2.0)));

        let lost = PointerEvent::capture_lost(7);
        assert_eq!(lost.pointer(), PointerId(7));
        assert!(lost.position().is_none());
    }

    #[test]
    fn test_device_bits_pass_through() {
        let event = PointerEvent::Move {
            pointer: PointerId(1),
            position: Point::new(3.0, 4.0),
            device: PointerDevice {
                in_contact: true,
                eraser_tip: true,
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PointerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
