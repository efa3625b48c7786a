//! Read-only ingestion of the legacy platform binary ink format.
//!
//! The binary layout belongs to the platform that wrote it, so decoding is
//! delegated to the host. This module only normalizes what the decoder
//! returns.

use super::{CodecError, CodecResult};
use crate::coords::{is_valid_size, normalize};
use crate::store::StrokeStore;
use crate::stroke::{Stroke, StrokeStyle};
use kurbo::{Point, Size};

/// One stroke as reported by a legacy decoder, in absolute coordinates of the
/// canvas the ink was captured on.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyStroke {
    pub points: Vec<Point>,
    pub style: StrokeStyle,
}

/// Host-provided decoder for legacy binary ink blobs.
pub trait LegacyInkDecoder {
    /// Decode a blob into absolute-coordinate strokes.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<LegacyStroke>, String>;
}

impl<F> LegacyInkDecoder for F
where
    F: Fn(&[u8]) -> Result<Vec<LegacyStroke>, String>,
{
    fn decode(&self, bytes: &[u8]) -> Result<Vec<LegacyStroke>, String> {
        self(bytes)
    }
}

pub(super) fn decode(
    bytes: &[u8],
    reference_size: Option<Size>,
    decoder: Option<&dyn LegacyInkDecoder>,
) -> CodecResult<StrokeStore> {
    let decoder = decoder.ok_or(CodecError::LegacyDecoderUnavailable)?;
    let size = reference_size.unwrap_or(Size::ZERO);
    if !is_valid_size(size) {
        return Err(CodecError::invalid_size(size));
    }

    let strokes = decoder.decode(bytes).map_err(CodecError::Legacy)?;
    let mut store = StrokeStore::with_reference_size(size);
    for (i, legacy) in strokes.into_iter().enumerate() {
        let points = legacy
            .points
            .into_iter()
            .map(|p| normalize(p, size))
            .collect();
        match Stroke::from_points(points) {
            Some(stroke) => {
                store.push(stroke, legacy.style);
            }
            None => log::warn!("Dropping legacy stroke {} with no points", i),
        }
    }
    log::info!("Imported {} legacy ink strokes", store.len());
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_strokes(_: &[u8]) -> Result<Vec<LegacyStroke>, String> {
        Ok(vec![
            LegacyStroke {
                points: vec![Point::new(50.0, 100.0), Point::new(100.0, 200.0)],
                style: StrokeStyle::pen(),
            },
            LegacyStroke {
                points: Vec::new(),
                style: StrokeStyle::pen(),
            },
        ])
    }

    fn broken(_: &[u8]) -> Result<Vec<LegacyStroke>, String> {
        Err("unrecognized ink header".to_string())
    }

    #[test]
    fn test_no_decoder() {
        assert!(matches!(
            decode(&[1, 2, 3], Some(Size::new(100.0, 100.0)), None),
            Err(CodecError::LegacyDecoderUnavailable)
        ));
    }

    #[test]
    fn test_normalizes_against_reference_size() {
        let store = decode(&[0], Some(Size::new(200.0, 400.0)), Some(&two_strokes)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.strokes()[0].points(),
            &[Point::new(0.25, 0.25), Point::new(0.5, 0.5)]
        );
        assert_eq!(store.reference_size(), Size::new(200.0, 400.0));
    }

    #[test]
    fn test_requires_reference_size() {
        assert!(matches!(
            decode(&[0], None, Some(&two_strokes)),
            Err(CodecError::InvalidReferenceSize { .. })
        ));
        assert!(matches!(
            decode(&[0], Some(Size::new(-1.0, 100.0)), Some(&two_strokes)),
            Err(CodecError::InvalidReferenceSize { .. })
        ));
    }

    #[test]
    fn test_decoder_failure() {
        let err = decode(&[0], Some(Size::new(10.0, 10.0)), Some(&broken)).unwrap_err();
        assert!(err.to_string().contains("unrecognized ink header"));
    }
}
