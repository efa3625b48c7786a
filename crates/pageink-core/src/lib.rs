//! PageInk Core Library
//!
//! Ink annotation over rendered pages: resolution-independent stroke storage,
//! pen/highlighter/eraser/rectangle tools, undo/redo, and a portable
//! serialization format with read support for legacy binary ink.

pub mod codec;
pub mod config;
pub mod coords;
pub mod document;
pub mod history;
pub mod input;
pub mod page;
pub mod render;
pub mod store;
pub mod stroke;
pub mod tools;

pub use codec::{CodecError, CodecResult, InkFormat, LegacyInkDecoder, LegacyStroke};
pub use config::{ConfigError, InkConfig};
pub use coords::{denormalize, normalize};
pub use document::InkDocument;
pub use history::{UndoAction, UndoEngine};
pub use input::{PointerDevice, PointerEvent, PointerId};
pub use page::{InkStatus, PageInk, PersistedInk};
pub use render::{RenderSync, RenderedStroke};
pub use store::StrokeStore;
pub use stroke::{InkColor, Stroke, StrokeStyle};
pub use tools::{DrawingMode, DrawingSession, Session, SessionEffect, SessionState};
