//! Stroke geometry and style.

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque RGB ink color, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InkColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Error returned when a color string is not `#RRGGBB` or `#AARRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color string: {0:?}")]
pub struct ColorParseError(pub String);

impl InkColor {
    pub const BLACK: InkColor = InkColor::new(0, 0, 0);
    pub const RED: InkColor = InkColor::new(255, 0, 0);
    pub const BLUE: InkColor = InkColor::new(0, 0, 255);
    pub const YELLOW: InkColor = InkColor::new(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, or `#AARRGGBB` with the alpha byte ignored.
    /// The leading `#` is optional.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let hex = s.trim().trim_start_matches('#');
        let rgb = match hex.len() {
            6 => Some(hex),
            8 => hex.get(2..),
            _ => None,
        }
        .ok_or_else(|| ColorParseError(s.to_string()))?;
        let channel = |i: usize| {
            rgb.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .ok_or_else(|| ColorParseError(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Upper-case `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for InkColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<InkColor> for String {
    fn from(color: InkColor) -> Self {
        color.to_hex()
    }
}

impl From<InkColor> for Color {
    fn from(color: InkColor) -> Self {
        Color::from_rgb8(color.r, color.g, color.b)
    }
}

/// Visual properties captured when a stroke begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    pub color: InkColor,
    /// Width in reference pixels.
    pub thickness: f64,
    /// 0.0 = invisible, 1.0 = opaque.
    pub opacity: f64,
    pub is_highlighter: bool,
}

impl StrokeStyle {
    /// Default pen: opaque black, 2px.
    pub const fn pen() -> Self {
        Self {
            color: InkColor::BLACK,
            thickness: 2.0,
            opacity: 1.0,
            is_highlighter: false,
        }
    }

    /// Default highlighter: half-transparent yellow, 12px.
    pub const fn highlighter() -> Self {
        Self {
            color: InkColor::YELLOW,
            thickness: 12.0,
            opacity: 0.5,
            is_highlighter: true,
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::pen()
    }
}

/// A finalized or in-progress ink stroke in normalized coordinates.
///
/// Always holds at least one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at `first`.
    pub fn new(first: Point) -> Self {
        Self {
            points: vec![first],
        }
    }

    /// Build a stroke from existing points; `None` if `points` is empty.
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        if points.is_empty() {
            None
        } else {
            Some(Self { points })
        }
    }

    /// Closed axis-aligned box through two opposite corners:
    /// top-left, top-right, bottom-right, bottom-left, top-left.
    pub fn rectangle(a: Point, b: Point) -> Self {
        let r = Rect::from_points(a, b);
        Self {
            points: vec![
                Point::new(r.x0, r.y0),
                Point::new(r.x1, r.y0),
                Point::new(r.x1, r.y1),
                Point::new(r.x0, r.y1),
                Point::new(r.x0, r.y0),
            ],
        }
    }

    /// Add a point to the end of the stroke.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// True if any point lies strictly within `radius` of `point`.
    ///
    /// Only the sampled points are tested, not the segments between them.
    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        self.points.iter().any(|p| p.distance(point) < radius)
    }
}
