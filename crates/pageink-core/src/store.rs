//! Canonical per-page stroke storage.

use crate::stroke::{Stroke, StrokeStyle};
use kurbo::{Point, Size};

/// Ordered strokes for one page, each paired by index with its style.
///
/// Points are normalized, so the contents are independent of the canvas size.
/// `reference_size` records the canvas size active at the last mutation and is
/// what absolute-coordinate formats are written against.
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
    strokes: Vec<Stroke>,
    styles: Vec<StrokeStyle>,
    reference_size: Size,
    /// Bumped on every structural change; lets renderers skip redundant rebuilds.
    revision: u64,
}

impl PartialEq for StrokeStore {
    fn eq(&self, other: &Self) -> bool {
        self.strokes == other.strokes
            && self.styles == other.styles
            && self.reference_size == other.reference_size
    }
}

impl StrokeStore {
    /// Create an empty store with no reference size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store bound to a reference canvas size.
    pub fn with_reference_size(size: Size) -> Self {
        Self {
            reference_size: size,
            ..Self::default()
        }
    }

    /// Append a stroke, returning its index.
    pub fn push(&mut self, stroke: Stroke, style: StrokeStyle) -> usize {
        self.strokes.push(stroke);
        self.styles.push(style);
        self.revision += 1;
        self.strokes.len() - 1
    }

    /// Insert a stroke at `index`, clamped to the current length.
    /// Returns the index actually used.
    pub fn insert(&mut self, index: usize, stroke: Stroke, style: StrokeStyle) -> usize {
        let index = index.min(self.strokes.len());
        self.strokes.insert(index, stroke);
        self.styles.insert(index, style);
        self.revision += 1;
        index
    }

    /// Remove the stroke at `index`.
    pub fn remove(&mut self, index: usize) -> Option<(Stroke, StrokeStyle)> {
        if index >= self.strokes.len() {
            return None;
        }
        self.revision += 1;
        Some((self.strokes.remove(index), self.styles.remove(index)))
    }

    /// Remove every stroke. The reference size is kept.
    pub fn clear(&mut self) {
        if !self.strokes.is_empty() {
            self.revision += 1;
        }
        self.strokes.clear();
        self.styles.clear();
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<(&Stroke, &StrokeStyle)> {
        Some((self.strokes.get(index)?, self.styles.get(index)?))
    }

    /// Iterate `(stroke, style)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&Stroke, &StrokeStyle)> {
        self.strokes.iter().zip(self.styles.iter())
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn styles(&self) -> &[StrokeStyle] {
        &self.styles
    }

    pub fn reference_size(&self) -> Size {
        self.reference_size
    }

    pub fn set_reference_size(&mut self, size: Size) {
        self.reference_size = size;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Index of the most recently added stroke with a point within `radius`
    /// of the normalized `point`.
    pub fn hit_test(&self, point: Point, radius: f64) -> Option<usize> {
        self.strokes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, stroke)| stroke.hit_test(point, radius))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(x: f64, y: f64) -> Stroke {
        Stroke::new(Point::new(x, y))
    }

    #[test]
    fn test_push_and_get() {
        let mut store = StrokeStore::new();
        assert!(store.is_empty());
        assert_eq!(store.push(dot(0.1, 0.1), StrokeStyle::pen()), 0);
        assert_eq!(store.push(dot(0.2, 0.2), StrokeStyle::highlighter()), 1);
        assert_eq!(store.len(), 2);

        let (stroke, style) = store.get(1).unwrap();
        assert_eq!(stroke, &dot(0.2, 0.2));
        assert!(style.is_highlighter);
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_insert_clamps() {
        let mut store = StrokeStore::new();
        store.push(dot(0.1, 0.1), StrokeStyle::pen());
        assert_eq!(store.insert(10, dot(0.3, 0.3), StrokeStyle::pen()), 1);
        assert_eq!(store.insert(0, dot(0.0, 0.0), StrokeStyle::pen()), 0);
        assert_eq!(store.strokes()[0], dot(0.0, 0.0));
        assert_eq!(store.strokes()[2], dot(0.3, 0.3));
    }

    #[test]
    fn test_remove() {
        let mut store = StrokeStore::new();
        store.push(dot(0.1, 0.1), StrokeStyle::pen());
        store.push(dot(0.2, 0.2), StrokeStyle::highlighter());

        let (stroke, style) = store.remove(0).unwrap();
        assert_eq!(stroke, dot(0.1, 0.1));
        assert!(!style.is_highlighter);
        assert_eq!(store.len(), 1);
        assert!(store.styles()[0].is_highlighter);
        assert!(store.remove(5).is_none());
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut store = StrokeStore::new();
        let r0 = store.revision();
        store.push(dot(0.1, 0.1), StrokeStyle::pen());
        assert!(store.revision() > r0);
        let r1 = store.revision();
        assert!(store.remove(3).is_none());
        assert_eq!(store.revision(), r1);
        store.clear();
        assert!(store.revision() > r1);
        let r2 = store.revision();
        store.clear();
        assert_eq!(store.revision(), r2);
    }

    #[test]
    fn test_equality_ignores_revision() {
        let mut a = StrokeStore::new();
        a.push(dot(0.1, 0.1), StrokeStyle::pen());
        a.push(dot(0.2, 0.2), StrokeStyle::pen());
        a.remove(1);

        let mut b = StrokeStore::new();
        b.push(dot(0.1, 0.1), StrokeStyle::pen());
        assert_ne!(a.revision(), b.revision());
        assert_eq!(a, b);
    }

    #[test]
    fn test_hit_test_prefers_newest() {
        let mut store = StrokeStore::new();
        store.push(dot(0.5, 0.5), StrokeStyle::pen());
        store.push(dot(0.51, 0.5), StrokeStyle::pen());
        store.push(dot(0.9, 0.9), StrokeStyle::pen());

        assert_eq!(store.hit_test(Point::new(0.505, 0.5), 0.02), Some(1));
        assert_eq!(store.hit_test(Point::new(0.9, 0.91), 0.02), Some(2));
        assert_eq!(store.hit_test(Point::new(0.1, 0.1), 0.02), None);
    }
}
