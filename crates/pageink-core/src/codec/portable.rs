//! Portable JSON ink format.
//!
//! ```text
//! {
//!   "canvasWidth": 800.0,
//!   "canvasHeight": 600.0,
//!   "strokes": [
//!     { "points": [{"x": 80.0, "y": 60.0}, ...],
//!       "color": "#FFFF00", "thickness": 12.0, "opacity": 0.5,
//!       "isHighlighter": true }
//!   ]
//! }
//! ```
//!
//! Points are absolute, relative to `canvasWidth` x `canvasHeight`.

use super::{CodecError, CodecResult};
use crate::coords::{denormalize, is_valid_size, normalize};
use crate::store::StrokeStore;
use crate::stroke::{InkColor, Stroke, StrokeStyle};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortableInk {
    #[serde(default)]
    canvas_width: f64,
    #[serde(default)]
    canvas_height: f64,
    #[serde(default)]
    strokes: Vec<PortableStroke>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortableStroke {
    #[serde(default)]
    points: Vec<PortablePoint>,
    #[serde(default = "default_color")]
    color: InkColor,
    #[serde(default = "default_thickness")]
    thickness: f64,
    #[serde(default = "default_opacity")]
    opacity: f64,
    #[serde(default)]
    is_highlighter: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PortablePoint {
    x: f64,
    y: f64,
}

fn default_color() -> InkColor {
    StrokeStyle::pen().color
}

fn default_thickness() -> f64 {
    StrokeStyle::pen().thickness
}

fn default_opacity() -> f64 {
    1.0
}

pub(super) fn encode(store: &StrokeStore) -> CodecResult<Vec<u8>> {
    let size = store.reference_size();
    if !is_valid_size(size) {
        return Err(CodecError::invalid_size(size));
    }

    let strokes = store
        .iter()
        .map(|(stroke, style)| PortableStroke {
            points: stroke
                .points()
                .iter()
                .map(|p| {
                    let abs = denormalize(*p, size);
                    PortablePoint { x: abs.x, y: abs.y }
                })
                .collect(),
            color: style.color,
            thickness: style.thickness,
            opacity: style.opacity,
            // The highlighter flag is re-derived from opacity on save.
            is_highlighter: style.opacity < 1.0,
        })
        .collect();

    let ink = PortableInk {
        canvas_width: size.width,
        canvas_height: size.height,
        strokes,
    };
    Ok(serde_json::to_vec(&ink)?)
}

pub(super) fn decode(bytes: &[u8], fallback_size: Option<Size>) -> CodecResult<StrokeStore> {
    let ink: PortableInk = serde_json::from_slice(bytes)?;

    let embedded = Size::new(ink.canvas_width, ink.canvas_height);
    let size = if is_valid_size(embedded) {
        embedded
    } else {
        match fallback_size {
            Some(size) if is_valid_size(size) => size,
            _ => return Err(CodecError::invalid_size(embedded)),
        }
    };

    let mut store = StrokeStore::with_reference_size(size);
    for (i, record) in ink.strokes.into_iter().enumerate() {
        let points = record
            .points
            .iter()
            .map(|p| normalize(Point::new(p.x, p.y), size))
            .collect();
        let Some(stroke) = Stroke::from_points(points) else {
            log::warn!("Dropping portable stroke {} with no points", i);
            continue;
        };
        store.push(
            stroke,
            StrokeStyle {
                color: record.color,
                thickness: record.thickness,
                opacity: record.opacity,
                is_highlighter: record.is_highlighter,
            },
        );
    }
    Ok(store)
}
