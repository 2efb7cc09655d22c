//! Configuration types for the subframe cache.

/// Color model a subframe is decoded to.
///
/// Selects which [`crate::subframe::PixelData`] variant the frame provider
/// is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    /// Dense packed ARGB values.
    Direct,
    /// Palette indices plus a palette.
    Indexed,
}

/// Cache configuration.
///
/// Plain data with chained builders:
///
/// ```
/// use rpflayer::config::{CacheConfig, ColorModel};
///
/// let config = CacheConfig::default()
///     .with_subframe_cache_size(32)
///     .with_color_model(ColorModel::Indexed);
/// assert_eq!(config.subframe_cache_size, 32);
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Slot count for the primary quadrant's pool.
    pub subframe_cache_size: usize,
    /// Slot count for the auxiliary quadrant pools.
    pub aux_cache_size: usize,
    /// Extra index-matrix cells kept on each side of the primary coverage
    /// extent, so tiles slightly outside the nominal coverage still cache.
    pub buffer_margin: usize,
    /// Color model requested from the frame provider.
    pub color_model: ColorModel,
    /// Whether to fetch and report subframe attribute text.
    pub report_attributes: bool,
    /// Whether to compute pixel-density scale factors against the current
    /// projection and attach them to output tiles.
    pub scale_images: bool,
    /// Opacity applied to every produced tile.
    pub opacity: u8,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            subframe_cache_size: 20,
            aux_cache_size: 8,
            buffer_margin: 2,
            color_model: ColorModel::Direct,
            report_attributes: false,
            scale_images: false,
            opacity: crate::subframe::OPAQUE,
        }
    }
}

impl CacheConfig {
    /// Set the primary pool capacity.
    pub fn with_subframe_cache_size(mut self, size: usize) -> Self {
        self.subframe_cache_size = size;
        self
    }

    /// Set the auxiliary pool capacity.
    pub fn with_aux_cache_size(mut self, size: usize) -> Self {
        self.aux_cache_size = size;
        self
    }

    /// Set the index-matrix buffer margin.
    pub fn with_buffer_margin(mut self, margin: usize) -> Self {
        self.buffer_margin = margin;
        self
    }

    /// Set the decode color model.
    pub fn with_color_model(mut self, model: ColorModel) -> Self {
        self.color_model = model;
        self
    }

    /// Enable or disable attribute-text reporting.
    pub fn with_report_attributes(mut self, report: bool) -> Self {
        self.report_attributes = report;
        self
    }

    /// Enable or disable projection pixel-density scaling.
    pub fn with_scale_images(mut self, scale: bool) -> Self {
        self.scale_images = scale;
        self
    }

    /// Set the render-time opacity for produced tiles.
    pub fn with_opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }
}
