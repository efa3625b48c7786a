//! Per-page ink engine: the host-facing API.

use crate::codec::{self, LegacyInkDecoder};
use crate::config::InkConfig;
use crate::coords::is_valid_size;
use crate::history::{self, UndoEngine};
use crate::input::PointerEvent;
use crate::render::{RenderSync, RenderedStroke};
use crate::store::StrokeStore;
use crate::stroke::{InkColor, Stroke, StrokeStyle};
use crate::tools::{DrawingMode, DrawingSession, SessionEffect, SessionState};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ink record the host should persist for a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedInk {
    pub page_number: u32,
    pub reference_canvas_width: f64,
    pub reference_canvas_height: f64,
    /// Portable-format bytes.
    pub encoded: Vec<u8>,
}

impl PersistedInk {
    pub fn reference_size(&self) -> Size {
        Size::new(self.reference_canvas_width, self.reference_canvas_height)
    }
}

/// Snapshot passed to state-changed listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkStatus {
    pub stroke_count: usize,
    pub can_undo: bool,
    pub can_redo: bool,
    pub has_unsaved_changes: bool,
    pub state: SessionState,
}

type StrokeListener = Box<dyn FnMut(usize, &Stroke, &StrokeStyle)>;
type StateListener = Box<dyn FnMut(&InkStatus)>;

/// Ink engine for one page: strokes, undo history, tool session and display
/// geometry.
pub struct PageInk {
    page_number: u32,
    config: InkConfig,
    store: StrokeStore,
    history: UndoEngine,
    session: DrawingSession,
    render: RenderSync,
    canvas_size: Size,
    dirty: bool,
    on_stroke_finalized: Option<StrokeListener>,
    on_state_changed: Option<StateListener>,
}

impl fmt::Debug for PageInk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageInk")
            .field("page_number", &self.page_number)
            .field("strokes", &self.store.len())
            .field("canvas_size", &self.canvas_size)
            .field("mode", &self.session.mode())
            .field("state", &self.session.state())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PageInk {
    pub fn new(page_number: u32, config: InkConfig) -> Self {
        Self {
            page_number,
            session: DrawingSession::new(&config),
            render: RenderSync::new(config.resize_tolerance),
            config,
            store: StrokeStore::new(),
            history: UndoEngine::new(),
            canvas_size: Size::ZERO,
            dirty: false,
            on_stroke_finalized: None,
            on_state_changed: None,
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn config(&self) -> &InkConfig {
        &self.config
    }

    pub fn strokes(&self) -> &StrokeStore {
        &self.store
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn mode(&self) -> DrawingMode {
        self.session.mode()
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Register a listener called after each stroke is committed, with its
    /// index in the store.
    pub fn on_stroke_finalized(
        &mut self,
        listener: impl FnMut(usize, &Stroke, &StrokeStyle) + 'static,
    ) {
        self.on_stroke_finalized = Some(Box::new(listener));
    }

    /// Register a listener called after any change to strokes, history or the
    /// dirty flag.
    pub fn on_state_changed(&mut self, listener: impl FnMut(&InkStatus) + 'static) {
        self.on_state_changed = Some(Box::new(listener));
    }

    pub fn status(&self) -> InkStatus {
        InkStatus {
            stroke_count: self.store.len(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            has_unsaved_changes: self.dirty,
            state: self.session.state(),
        }
    }

    /// Report the current layout size of the ink canvas.
    ///
    /// Display geometry is rebuilt when the strokes changed since the last
    /// build (including while the canvas had no valid size) or when a
    /// dimension moves past the resize tolerance.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        let size = Size::new(width, height);
        self.canvas_size = size;
        self.session.set_canvas_size(size);
        if !is_valid_size(size) {
            return;
        }
        self.store.set_reference_size(size);
        self.render.sync(&self.store, size);
    }

    /// Feed a pointer event. Returns true if the stroke store changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match self.session.handle(event) {
            Some(effect) => self.apply(effect),
            None => false,
        }
    }

    pub fn is_inking_enabled(&self) -> bool {
        self.session.is_enabled()
    }

    /// Enable or disable ink input. While disabled, pointer events pass
    /// through untouched; a gesture in progress is finalized first.
    pub fn set_inking_enabled(&mut self, enabled: bool) {
        if let Some(effect) = self.session.set_enabled(enabled) {
            self.apply(effect);
        }
    }

    pub fn select_pen(&mut self) {
        self.session.select_pen();
    }

    pub fn set_pen_color(&mut self, color: InkColor) {
        self.session.set_pen_color(color);
    }

    pub fn set_thickness(&mut self, thickness: f64) {
        self.session.set_thickness(thickness);
    }

    /// Switch to the highlighter, keeping any color or thickness set earlier.
    pub fn select_highlighter(&mut self) {
        self.session.select_highlighter();
    }

    pub fn set_highlighter_color(&mut self, color: InkColor) {
        self.session.set_highlighter_color(color);
    }

    pub fn select_eraser(&mut self) {
        self.session.select_eraser();
    }

    pub fn select_rectangle(&mut self) {
        self.session.select_rectangle();
    }

    /// Remove every stroke. Each removal is its own undo step, so repeated
    /// undo restores the strokes in their original order.
    pub fn clear_all(&mut self) -> usize {
        let removed = history::clear_strokes(&mut self.store, &mut self.history);
        if removed > 0 {
            log::debug!("Cleared {} strokes on page {}", removed, self.page_number);
            self.changed();
        }
        removed
    }

    pub fn undo(&mut self) -> bool {
        let done = self.history.undo(&mut self.store);
        if done {
            self.changed();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.store);
        if done {
            self.changed();
        }
        done
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Whether ink changed since the last load or [`mark_saved`](Self::mark_saved).
    /// Unlike [`data_to_persist`](Self::data_to_persist), a page cleared to
    /// empty still reports pending changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// The host persisted (or deleted) this page's record.
    pub fn mark_saved(&mut self) {
        if self.dirty {
            self.dirty = false;
            self.notify_state();
        }
    }

    /// Encoded ink for the host to store. `None` means there is nothing to
    /// persist and any stored record for the page should be deleted.
    pub fn data_to_persist(&self) -> Option<PersistedInk> {
        if self.store.is_empty() || !is_valid_size(self.canvas_size) {
            return None;
        }
        match codec::encode(&self.store) {
            Ok(encoded) => Some(PersistedInk {
                page_number: self.page_number,
                reference_canvas_width: self.store.reference_size().width,
                reference_canvas_height: self.store.reference_size().height,
                encoded,
            }),
            Err(e) => {
                log::warn!("Failed to encode ink for page {}: {}", self.page_number, e);
                None
            }
        }
    }

    /// Replace the page's ink with a persisted blob.
    ///
    /// Never fails: unreadable ink leaves the page empty. History and the
    /// dirty flag are reset.
    pub fn load(
        &mut self,
        bytes: &[u8],
        reference_size: Option<Size>,
        legacy_decoder: Option<&dyn LegacyInkDecoder>,
    ) {
        self.store = codec::load_collection(bytes, reference_size, legacy_decoder);
        log::info!(
            "Loaded {} ink strokes for page {}",
            self.store.len(),
            self.page_number
        );
        if is_valid_size(self.canvas_size) {
            self.store.set_reference_size(self.canvas_size);
        }
        self.history.clear();
        self.dirty = false;
        self.render.invalidate();
        self.render.sync(&self.store, self.canvas_size);
        self.notify_state();
    }

    /// Load from a record previously returned by [`data_to_persist`](Self::data_to_persist).
    pub fn load_record(
        &mut self,
        record: &PersistedInk,
        legacy_decoder: Option<&dyn LegacyInkDecoder>,
    ) {
        self.load(&record.encoded, Some(record.reference_size()), legacy_decoder);
    }

    /// Display geometry for the stored strokes.
    pub fn rendered(&self) -> &[RenderedStroke] {
        self.render.rendered()
    }

    pub fn render_sync(&self) -> &RenderSync {
        &self.render
    }

    /// Display geometry for the gesture in progress, if any.
    pub fn preview(&self) -> Option<RenderedStroke> {
        if !is_valid_size(self.canvas_size) {
            return None;
        }
        let (stroke, style) = self.session.preview()?;
        Some(RenderedStroke::from_stroke(&stroke, &style, self.canvas_size))
    }

    fn apply(&mut self, effect: SessionEffect) -> bool {
        match effect {
            SessionEffect::Commit { stroke, style } => {
                let index = history::add_stroke(&mut self.store, &mut self.history, stroke, style);
                self.changed();
                if let (Some(listener), Some((stroke, style))) =
                    (self.on_stroke_finalized.as_mut(), self.store.get(index))
                {
                    listener(index, stroke, style);
                }
                true
            }
            SessionEffect::EraseAt(point) => {
                let Some(index) = self.store.hit_test(point, self.config.eraser_radius) else {
                    return false;
                };
                history::remove_stroke(&mut self.store, &mut self.history, index);
                self.changed();
                true
            }
        }
    }

    fn changed(&mut self) {
        self.dirty = true;
        if is_valid_size(self.canvas_size) {
            self.store.set_reference_size(self.canvas_size);
        }
        self.render.sync(&self.store, self.canvas_size);
        self.notify_state();
    }

    fn notify_state(&mut self) {
        let status = self.status();
        if let Some(listener) = self.on_state_changed.as_mut() {
            listener(&status);
        }
    }
}
