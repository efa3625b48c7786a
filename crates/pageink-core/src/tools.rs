//! Tool state machine that turns pointer events into ink edits.
//!
//! `DrawingSession` never touches the stroke store itself. Each event may
//! yield a [`SessionEffect`] which the owning page applies to its store and
//! undo history.

use crate::config::InkConfig;
use crate::coords::{is_valid_size, normalize};
use crate::input::{PointerEvent, PointerId};
use crate::stroke::{InkColor, Stroke, StrokeStyle};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DrawingMode {
    #[default]
    Pen,
    Highlighter,
    Eraser,
    Rectangle,
}

/// Coarse state of the session, for hosts and listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    DrawingStroke,
    DrawingRectangle,
    Erasing,
}

/// What an active gesture is building.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Freehand ink (pen or highlighter) with the style captured at pointer-down.
    Stroke { stroke: Stroke, style: StrokeStyle },
    /// Rectangle drag; both corners normalized.
    Rectangle {
        anchor: Point,
        current: Point,
        style: StrokeStyle,
    },
    /// Eraser sweep; each event erases on its own.
    Erasing,
}

/// A gesture owned by a single pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGesture {
    pub pointer: PointerId,
    pub gesture: Gesture,
}

/// In-progress drawing state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Idle,
    Active(ActiveGesture),
}

/// Store edit requested by the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Append a finished stroke.
    Commit { stroke: Stroke, style: StrokeStyle },
    /// Remove the newest stroke hit at this normalized point, if any.
    EraseAt(Point),
}

/// Pointer-driven tool state machine for one page.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    mode: DrawingMode,
    pen_style: StrokeStyle,
    highlighter_style: StrokeStyle,
    min_rectangle_size: f64,
    canvas_size: Size,
    enabled: bool,
    session: Session,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new(&InkConfig::default())
    }
}

impl DrawingSession {
    /// Create an idle, enabled session using the config's tool defaults.
    pub fn new(config: &InkConfig) -> Self {
        Self {
            mode: DrawingMode::default(),
            pen_style: config.pen,
            highlighter_style: config.highlighter,
            min_rectangle_size: config.min_rectangle_size,
            canvas_size: Size::ZERO,
            enabled: true,
            session: Session::Idle,
        }
    }

    pub fn mode(&self) -> DrawingMode {
        self.mode
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        match &self.session {
            Session::Idle => SessionState::Idle,
            Session::Active(active) => match active.gesture {
                Gesture::Stroke { .. } => SessionState::DrawingStroke,
                Gesture::Rectangle { .. } => SessionState::DrawingRectangle,
                Gesture::Erasing => SessionState::Erasing,
            },
        }
    }

    /// Check if a gesture is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.session, Session::Active(_))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: Size) {
        self.canvas_size = size;
    }

    /// Style new pen and rectangle gestures will use.
    pub fn pen_style(&self) -> StrokeStyle {
        self.pen_style
    }

    /// Style new highlighter gestures will use.
    pub fn highlighter_style(&self) -> StrokeStyle {
        self.highlighter_style
    }

    /// Style the current tool would snapshot on pointer-down.
    pub fn active_style(&self) -> StrokeStyle {
        match self.mode {
            DrawingMode::Highlighter => self.highlighter_style,
            _ => self.pen_style,
        }
    }

    /// Enable or disable inking. Disabling mid-gesture finishes the gesture
    /// as if the pointer had been released.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<SessionEffect> {
        self.enabled = enabled;
        if enabled {
            return None;
        }
        self.finish()
    }

    pub fn select_pen(&mut self) {
        self.set_mode(DrawingMode::Pen);
    }

    /// Change the pen color and switch to the pen.
    pub fn set_pen_color(&mut self, color: InkColor) {
        self.pen_style.color = color;
        self.set_mode(DrawingMode::Pen);
    }

    /// Change the thickness of the current tool's style. The eraser has no
    /// style, so it updates the pen.
    pub fn set_thickness(&mut self, thickness: f64) {
        if !(thickness.is_finite() && thickness > 0.0) {
            log::warn!("Ignoring invalid stroke thickness {}", thickness);
            return;
        }
        match self.mode {
            DrawingMode::Highlighter => self.highlighter_style.thickness = thickness,
            _ => self.pen_style.thickness = thickness,
        }
    }

    pub fn select_highlighter(&mut self) {
        self.set_mode(DrawingMode::Highlighter);
    }

    /// Change the highlighter color and switch to the highlighter.
    pub fn set_highlighter_color(&mut self, color: InkColor) {
        self.highlighter_style.color = color;
        self.set_mode(DrawingMode::Highlighter);
    }

    pub fn select_eraser(&mut self) {
        self.set_mode(DrawingMode::Eraser);
    }

    pub fn select_rectangle(&mut self) {
        self.set_mode(DrawingMode::Rectangle);
    }

    /// Switch tools. A gesture already in progress keeps the tool and style it
    /// started with.
    pub fn set_mode(&mut self, mode: DrawingMode) {
        if self.mode != mode {
            log::debug!("Ink tool {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Feed one pointer event.
    pub fn handle(&mut self, event: PointerEvent) -> Option<SessionEffect> {
        if !self.enabled {
            log::trace!("Inking disabled, passing through {:?}", event);
            return None;
        }

        match event {
            PointerEvent::Down {
                pointer, position, ..
            } => self.begin(pointer, position),
            PointerEvent::Move {
                pointer, position, ..
            } => self.update(pointer, position),
            PointerEvent::Up { .. } | PointerEvent::CaptureLost { .. } => {
                if !self.owns(event.pointer()) {
                    return None;
                }
                if let Some(position) = event.position() {
                    self.release_at(position);
                }
                self.finish()
            }
        }
    }

    /// The in-progress stroke as it would be committed now, for live preview.
    pub fn preview(&self) -> Option<(Stroke, StrokeStyle)> {
        let Session::Active(active) = &self.session else {
            return None;
        };
        match &active.gesture {
            Gesture::Stroke { stroke, style } => Some((stroke.clone(), *style)),
            Gesture::Rectangle {
                anchor,
                current,
                style,
            } => Some((Stroke::rectangle(*anchor, *current), *style)),
            Gesture::Erasing => None,
        }
    }

    fn owns(&self, pointer: PointerId) -> bool {
        matches!(&self.session, Session::Active(active) if active.pointer == pointer)
    }

    fn normalized(&self, position: Point) -> Option<Point> {
        if is_valid_size(self.canvas_size) {
            Some(normalize(position, self.canvas_size))
        } else {
            log::debug!(
                "Ignoring pointer at {:?}: canvas size {:?} not laid out",
                position,
                self.canvas_size
            );
            None
        }
    }

    fn begin(&mut self, pointer: PointerId, position: Point) -> Option<SessionEffect> {
        if let Session::Active(active) = &self.session {
            log::trace!(
                "Pointer {:?} down ignored, gesture owned by {:?}",
                pointer,
                active.pointer
            );
            return None;
        }
        let point = self.normalized(position)?;

        let (gesture, effect) = match self.mode {
            DrawingMode::Pen => (
                Gesture::Stroke {
                    stroke: Stroke::new(point),
                    style: self.pen_style,
                },
                None,
            ),
            DrawingMode::Highlighter => (
                Gesture::Stroke {
                    stroke: Stroke::new(point),
                    style: self.highlighter_style,
                },
                None,
            ),
            DrawingMode::Rectangle => (
                Gesture::Rectangle {
                    anchor: point,
                    current: point,
                    style: self.pen_style,
                },
                None,
            ),
            DrawingMode::Eraser => (Gesture::Erasing, Some(SessionEffect::EraseAt(point))),
        };

        self.session = Session::Active(ActiveGesture { pointer, gesture });
        effect
    }

    fn update(&mut self, pointer: PointerId, position: Point) -> Option<SessionEffect> {
        if !self.owns(pointer) {
            return None;
        }
        let point = self.normalized(position)?;
        let Session::Active(active) = &mut self.session else {
            return None;
        };

        match &mut active.gesture {
            Gesture::Stroke { stroke, .. } => {
                stroke.add_point(point);
                None
            }
            Gesture::Rectangle { current, .. } => {
                *current = point;
                None
            }
            Gesture::Erasing => Some(SessionEffect::EraseAt(point)),
        }
    }

    /// A release moves the rectangle's free corner; strokes and the eraser
    /// ignore the release position.
    fn release_at(&mut self, position: Point) {
        let Some(point) = self.normalized(position) else {
            return;
        };
        if let Session::Active(ActiveGesture {
            gesture: Gesture::Rectangle { current, .. },
            ..
        }) = &mut self.session
        {
            *current = point;
        }
    }

    /// End the current gesture and return the stroke to commit, if any.
    fn finish(&mut self) -> Option<SessionEffect> {
        let Session::Active(active) = std::mem::take(&mut self.session) else {
            return None;
        };

        match active.gesture {
            Gesture::Stroke { stroke, style } => Some(SessionEffect::Commit { stroke, style }),
            Gesture::Rectangle {
                anchor,
                current,
                style,
            } => {
                let width = (current.x - anchor.x).abs() * self.canvas_size.width;
                let height = (current.y - anchor.y).abs() * self.canvas_size.height;
                if width > self.min_rectangle_size && height > self.min_rectangle_size {
                    Some(SessionEffect::Commit {
                        stroke: Stroke::rectangle(anchor, current),
                        style,
                    })
                } else {
                    log::debug!("Discarding {:.1}x{:.1} rectangle", width, height);
                    None
                }
            }
            Gesture::Erasing => None,
        }
    }
}
