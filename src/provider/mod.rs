//! Frame provider capability.
//!
//! The cache consumes a [`FrameProvider`] to turn geographic queries into
//! coverage boxes and subframe coordinates into decoded pixel data. The
//! provider owns all catalog parsing and decompression; the cache never
//! touches catalog bytes itself.

use thiserror::Error;

use crate::config::ColorModel;
use crate::coord::{GeoRect, Projection};
use crate::coverage::{CoverageBox, SourceId};
use crate::subframe::PixelData;

/// Errors surfaced by a frame provider.
///
/// The cache treats every provider error the same as an absent tile: the
/// failure is logged and the tile omitted from output, never propagated.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The catalog or table of contents could not be read.
    #[error("catalog read failed: {0}")]
    Catalog(String),

    /// A subframe exists but could not be decoded.
    #[error("subframe decode failed: {0}")]
    Decode(String),
}

/// Capability that decodes RPF catalog content for the cache.
///
/// # Precondition
///
/// All coverage boxes returned for one request must share the same
/// subframe angular spacing. The fallback path translates coordinates
/// between boxes as `(requested - primary.start) + alternate.start`,
/// which is only correct under that assumption.
pub trait FrameProvider: Send + Sync {
    /// Candidate source regions intersecting the viewport, ordered by
    /// descending preference. The first box is the primary source.
    ///
    /// An empty list means no catalog entry covers the viewport.
    fn coverage(&self, view: &GeoRect, projection: &dyn Projection) -> Vec<CoverageBox>;

    /// Decode the subframe at entry-grid index `(x, y)` of `source`.
    ///
    /// Returns `Ok(None)` when the tile does not exist in that entry; this
    /// is the expected, common case near coverage edges.
    fn subframe_data(
        &self,
        source: SourceId,
        x: i32,
        y: i32,
        model: ColorModel,
    ) -> Result<Option<PixelData>, ProviderError>;

    /// Optional human-readable metadata for a subframe.
    fn subframe_attributes(&self, source: SourceId, x: i32, y: i32) -> Option<String>;
}
