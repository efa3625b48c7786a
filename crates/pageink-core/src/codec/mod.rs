//! Persisted ink encoding.
//!
//! Two encodings are understood:
//! - the portable JSON format (always written, see [`portable`]);
//! - the legacy platform binary ink, read-only, through a host-supplied
//!   [`LegacyInkDecoder`].
//!
//! The first byte of a blob picks the format: `{` means portable JSON,
//! anything else is handed to the legacy decoder.

mod legacy;
mod portable;

pub use legacy::{LegacyInkDecoder, LegacyStroke};

use crate::store::StrokeStore;
use kurbo::Size;
use thiserror::Error;

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Invalid portable ink: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid reference canvas size {width}x{height}")]
    InvalidReferenceSize { width: f64, height: f64 },
    #[error("Legacy ink found but no legacy decoder is available")]
    LegacyDecoderUnavailable,
    #[error("Legacy ink decode failed: {0}")]
    Legacy(String),
}

impl CodecError {
    fn invalid_size(size: Size) -> Self {
        CodecError::InvalidReferenceSize {
            width: size.width,
            height: size.height,
        }
    }
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Encoding detected from a blob's first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InkFormat {
    Portable,
    Legacy,
}

impl InkFormat {
    /// `None` for an empty blob.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes.first()? {
            b'{' => Some(InkFormat::Portable),
            _ => Some(InkFormat::Legacy),
        }
    }
}

/// Encode a collection in the portable format, with points made absolute
/// against the store's reference size.
pub fn encode(store: &StrokeStore) -> CodecResult<Vec<u8>> {
    portable::encode(store)
}

/// Decode a persisted blob.
///
/// `reference_size` is the canvas size stored alongside the blob by the host.
/// Legacy ink requires it; portable ink embeds its own and only falls back to
/// it when the embedded size is missing.
pub fn decode(
    bytes: &[u8],
    reference_size: Option<Size>,
    legacy_decoder: Option<&dyn LegacyInkDecoder>,
) -> CodecResult<StrokeStore> {
    match InkFormat::detect(bytes) {
        None => Ok(StrokeStore::with_reference_size(reference_size.unwrap_or_default())),
        Some(InkFormat::Portable) => portable::decode(bytes, reference_size),
        Some(InkFormat::Legacy) => legacy::decode(bytes, reference_size, legacy_decoder),
    }
}

/// Fail-soft [`decode`]: any failure is logged and yields an empty store.
pub fn load_collection(
    bytes: &[u8],
    reference_size: Option<Size>,
    legacy_decoder: Option<&dyn LegacyInkDecoder>,
) -> StrokeStore {
    match decode(bytes, reference_size, legacy_decoder) {
        Ok(store) => store,
        Err(e) => {
            log::warn!("Skipping page ink ({} bytes): {}", bytes.len(), e);
            StrokeStore::with_reference_size(reference_size.unwrap_or(Size::ZERO))
        }
    }
}
