//! Subframe slot and render-output types.
//!
//! A [`Subframe`] is one decoded 256x256 raster tile held in a cache slot.
//! Slots are allocated once when the pool is built and reused in place: a
//! load overwrites the slot's contents and bumps its version stamp, which
//! is how the index matrix detects that a slot was recycled for other
//! content.

use std::sync::Arc;

use crate::coord::GeoRect;

/// Pixel span of one RPF subframe along each axis.
pub const SUBFRAME_PIXEL_SPAN: usize = 256;

/// Fully opaque opacity value.
pub const OPAQUE: u8 = 255;

/// Decoded raster data for one subframe.
///
/// The two representations are mutually exclusive: a subframe is decoded
/// either to direct color values or to palette indices plus the palette,
/// depending on the configured color model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelData {
    /// Dense array of packed ARGB color values, row-major.
    Direct(Vec<u32>),
    /// Indexed-color raster: one palette index per pixel plus the palette.
    Indexed {
        /// Palette index per pixel, row-major.
        indices: Vec<u8>,
        /// Packed ARGB palette entries.
        palette: Vec<u32>,
    },
}

impl PixelData {
    /// Number of pixels carried by this raster.
    pub fn pixel_count(&self) -> usize {
        match self {
            PixelData::Direct(values) => values.len(),
            PixelData::Indexed { indices, .. } => indices.len(),
        }
    }

    /// Whether this raster carries no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }
}

/// One cache slot: a decoded subframe plus its bookkeeping.
///
/// The pixel data sits behind an [`Arc`] so a slot can be handed to the
/// rendering layer as a [`RasterTile`] without copying raster bytes, while
/// the slot itself stays resident in the pool for the next repaint.
#[derive(Debug, Clone)]
pub struct Subframe {
    /// Decoded raster data.
    pub pixels: Arc<PixelData>,
    /// Incremented every time this slot is reloaded with different tile
    /// content. An index-matrix entry recording an older version is stale.
    pub version: u64,
    /// Geographic extent assigned when the tile was loaded.
    pub bounds: GeoRect,
    /// Optional human-readable metadata, fetched lazily.
    pub attribute_text: Option<String>,
    /// Opacity applied at render time.
    pub opacity: u8,
}

impl Default for Subframe {
    fn default() -> Self {
        Self {
            pixels: Arc::new(PixelData::Direct(Vec::new())),
            version: 0,
            bounds: GeoRect::new(0.0, 0.0, 0.0, 0.0),
            attribute_text: None,
            opacity: OPAQUE,
        }
    }
}

/// A geolocated, renderable tile produced by the cache.
///
/// This is what [`crate::manager::CacheManager::get_rectangle`] hands to
/// the rendering layer. Cloning a tile is cheap; the raster data is shared.
#[derive(Debug, Clone)]
pub struct RasterTile {
    /// Decoded raster data, shared with the originating cache slot.
    pub pixels: Arc<PixelData>,
    /// Geographic extent of the tile.
    pub bounds: GeoRect,
    /// Opacity to apply at render time.
    pub opacity: u8,
    /// Human-readable metadata, when attribute reporting is enabled.
    pub attributes: Option<String>,
    /// Pixel-density scale factors (x, y) when rescaling is configured.
    pub scale: Option<(f64, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_count_direct() {
        let pixels = PixelData::Direct(vec![0; 16]);
        assert_eq!(pixels.pixel_count(), 16);
        assert!(!pixels.is_empty());
    }

    #[test]
    fn test_pixel_count_indexed() {
        let pixels = PixelData::Indexed {
            indices: vec![0; 9],
            palette: vec![0xFF000000; 4],
        };
        assert_eq!(pixels.pixel_count(), 9);
    }

    #[test]
    fn test_default_subframe_is_empty() {
        let subframe = Subframe::default();
        assert!(subframe.pixels.is_empty());
        assert_eq!(subframe.version, 0);
        assert!(subframe.attribute_text.is_none());
        assert_eq!(subframe.opacity, OPAQUE);
    }

    #[test]
    fn test_raster_tile_shares_pixels() {
        let subframe = Subframe {
            pixels: Arc::new(PixelData::Direct(vec![1, 2, 3])),
            ..Subframe::default()
        };
        let tile = RasterTile {
            pixels: Arc::clone(&subframe.pixels),
            bounds: subframe.bounds,
            opacity: subframe.opacity,
            attributes: None,
            scale: None,
        };
        assert!(Arc::ptr_eq(&subframe.pixels, &tile.pixels));
    }
}
