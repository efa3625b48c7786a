//! Display geometry kept in sync with the stroke store.

use crate::coords::{denormalize, is_valid_size, size_changed, DEFAULT_RESIZE_TOLERANCE};
use crate::store::StrokeStore;
use crate::stroke::{InkColor, Stroke, StrokeStyle};
use kurbo::{BezPath, Size};
use peniko::Color;

/// One stroke as a screen-space polyline plus paint properties.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedStroke {
    pub path: BezPath,
    pub color: InkColor,
    pub width: f64,
    pub opacity: f64,
    pub is_highlighter: bool,
    /// Paint color with opacity applied.
    pub brush: Color,
}

impl RenderedStroke {
    /// Build the screen polyline for a normalized stroke. A single point
    /// becomes a zero-length segment so round caps still draw a dot.
    pub fn from_stroke(stroke: &Stroke, style: &StrokeStyle, size: Size) -> Self {
        let mut path = BezPath::new();
        let mut points = stroke.points().iter().map(|p| denormalize(*p, size));
        if let Some(first) = points.next() {
            path.move_to(first);
            let mut drew = false;
            for p in points {
                path.line_to(p);
                drew = true;
            }
            if !drew {
                path.line_to(first);
            }
        }

        Self {
            path,
            color: style.color,
            width: style.thickness,
            opacity: style.opacity,
            is_highlighter: style.is_highlighter,
            brush: brush(style),
        }
    }
}

fn brush(style: &StrokeStyle) -> Color {
    let alpha = (style.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(style.color.r, style.color.g, style.color.b, alpha)
}

/// Cached display geometry for the finalized strokes of one page.
#[derive(Debug, Clone)]
pub struct RenderSync {
    rendered: Vec<RenderedStroke>,
    /// Size and store revision the cache was built for.
    built_for: Option<(Size, u64)>,
    tolerance: f64,
    rebuilds: u64,
}

impl Default for RenderSync {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_TOLERANCE)
    }
}

impl RenderSync {
    pub fn new(tolerance: f64) -> Self {
        Self {
            rendered: Vec::new(),
            built_for: None,
            tolerance,
            rebuilds: 0,
        }
    }

    /// Geometry for every stored stroke, in index order.
    pub fn rendered(&self) -> &[RenderedStroke] {
        &self.rendered
    }

    /// Number of rebuilds performed so far.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Canvas size the current geometry was built for.
    pub fn built_size(&self) -> Option<Size> {
        self.built_for.map(|(size, _)| size)
    }

    /// Whether a canvas size change should trigger a rebuild: the first valid
    /// size always does, later ones only past the tolerance.
    pub fn needs_resize(&self, size: Size) -> bool {
        if !is_valid_size(size) {
            return false;
        }
        match self.built_for {
            None => true,
            Some((built, _)) => size_changed(built, size, self.tolerance),
        }
    }

    /// Bring the geometry up to date with `store` at `size`.
    ///
    /// Rebuilds when the store changed since the last build or the size moved
    /// past the tolerance. Returns whether a rebuild happened; calling it again
    /// with nothing changed is a no-op.
    pub fn sync(&mut self, store: &StrokeStore, size: Size) -> bool {
        if !is_valid_size(size) {
            return false;
        }
        let stale = match self.built_for {
            None => true,
            Some((built, revision)) => {
                revision != store.revision() || size_changed(built, size, self.tolerance)
            }
        };
        if !stale {
            return false;
        }
        self.rebuild(store, size);
        true
    }

    /// Unconditionally discard and regenerate all geometry.
    pub fn rebuild(&mut self, store: &StrokeStore, size: Size) {
        self.rendered.clear();
        self.rendered.extend(
            store
                .iter()
                .map(|(stroke, style)| RenderedStroke::from_stroke(stroke, style, size)),
        );
        self.built_for = Some((size, store.revision()));
        self.rebuilds += 1;
    }

    /// Drop the cached geometry so the next `sync` rebuilds.
    pub fn invalidate(&mut self) {
        self.rendered.clear();
        self.built_for = None;
    }
}
