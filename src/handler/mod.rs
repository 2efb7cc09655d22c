//! Per-quadrant cache handler.
//!
//! A [`CacheHandler`] owns one LRU pool, one index matrix, and the
//! coverage boxes for the current request. Given a non-wrapping viewport
//! it computes which subframe coordinates are needed, serves cache hits,
//! loads misses through the frame provider, and falls back across
//! overlapping alternate coverage boxes when the primary source has no
//! data at a coordinate.
//!
//! Absent tiles are silent: a map with gaps is valid output. Nothing in
//! this module raises an error to the caller.

use std::sync::Arc;

use crate::cache::{CellState, IndexMatrix, SubframeCache};
use crate::config::CacheConfig;
use crate::coord::{GeoRect, Projection};
use crate::coverage::CoverageBox;
use crate::provider::FrameProvider;
use crate::subframe::{RasterTile, Subframe, SUBFRAME_PIXEL_SPAN};

/// Outcome of resolving one subframe coordinate.
enum Resolved {
    /// Resident in the pool at this slot.
    Pooled(usize),
    /// Decoded outside the pool; valid for this request only.
    Throwaway(Subframe),
}

/// Cache handler for one quadrant of the viewport.
pub struct CacheHandler {
    config: CacheConfig,
    cache: SubframeCache,
    matrix: IndexMatrix,
    /// Coverage boxes for the current request, primary first.
    coverages: Vec<CoverageBox>,
    /// Whether the last `set_cache` found any coverage.
    valid: bool,
    /// Pixel-density scale factors for the current request.
    scale: Option<(f64, f64)>,
}

impl CacheHandler {
    /// Create a handler with a pool of the given capacity.
    pub fn new(config: CacheConfig, capacity: usize) -> Self {
        Self {
            config,
            cache: SubframeCache::new(capacity),
            matrix: IndexMatrix::new(0, 0),
            coverages: Vec::new(),
            valid: false,
            scale: None,
        }
    }

    /// Whether the handler currently has coverage to serve from.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Drop all cached lookups.
    ///
    /// Call when the frame provider or rendering attributes change; the
    /// pool slots themselves stay allocated and are recycled naturally.
    pub fn clear(&mut self) {
        self.matrix.clear();
        self.valid = false;
        self.coverages.clear();
    }

    /// Point the handler at a new viewport.
    ///
    /// Queries the provider for coverage boxes. With no coverage the
    /// handler is marked invalid and serves nothing. Otherwise the first
    /// (best) box becomes the primary source; the index matrix is rebuilt
    /// only when the primary geometry actually changed, so repeated
    /// requests for an unchanged region keep their cached lookups.
    pub fn set_cache(
        &mut self,
        provider: &dyn FrameProvider,
        view: &GeoRect,
        projection: &dyn Projection,
    ) {
        let boxes = provider.coverage(view, projection);
        let Some(primary) = boxes.first() else {
            tracing::debug!(?view, "no coverage for viewport");
            self.clear();
            return;
        };

        let margin = self.config.buffer_margin;
        let width = primary.horizontal_subframes() + 2 * margin;
        let height = primary.vertical_subframes() + 2 * margin;

        let same_geometry = self.valid
            && self.coverages.first().is_some_and(|prev| {
                prev.source == primary.source
                    && prev.start_x == primary.start_x
                    && prev.start_y == primary.start_y
                    && prev.end_x == primary.end_x
                    && prev.end_y == primary.end_y
            });

        if !same_geometry || self.matrix.width() != width || self.matrix.height() != height {
            self.matrix = IndexMatrix::new(width, height);
        }

        self.scale = if self.config.scale_images {
            Some(Self::pixel_scale(view, projection, primary))
        } else {
            None
        };
        self.coverages = boxes;
        self.valid = true;
    }

    /// Resolve every subframe in the primary coverage range and append the
    /// renderable tiles to `out` in scan order (columns outer, rows inner).
    pub fn get_subframes(
        &mut self,
        provider: &dyn FrameProvider,
        view: &GeoRect,
        projection: &dyn Projection,
        out: &mut Vec<RasterTile>,
    ) {
        self.set_cache(provider, view, projection);
        if !self.valid {
            return;
        }

        let primary = &self.coverages[0];
        let columns = primary.horizontal_subframes() as i32;
        let rows = primary.vertical_subframes() as i32;

        let mut running_count = 0usize;
        for x in 0..columns {
            for y in 0..rows {
                running_count += 1;
                let tile = match self.resolve(provider, x, y, running_count) {
                    Some(Resolved::Pooled(slot)) => Some(self.render(self.cache.slot(slot))),
                    Some(Resolved::Throwaway(subframe)) => Some(self.render(&subframe)),
                    None => self
                        .resolve_from_alternates(provider, x, y)
                        .map(|subframe| self.render(&subframe)),
                };
                if let Some(tile) = tile {
                    out.push(tile);
                }
            }
        }
    }

    /// Resolve one coordinate (relative to the primary box's start index)
    /// against the primary coverage box.
    ///
    /// `running_count` is the number of distinct coordinates requested so
    /// far in this request. Once it exceeds the pool capacity, further
    /// loads go to throwaway subframes so slots claimed earlier in the
    /// same request are not overwritten before they are read.
    fn resolve(
        &mut self,
        provider: &dyn FrameProvider,
        x: i32,
        y: i32,
        running_count: usize,
    ) -> Option<Resolved> {
        if self.coverages.is_empty() {
            return None;
        }
        let margin = self.config.buffer_margin as i32;
        let (mx, my) = (x + margin, y + margin);
        let cell = self.matrix.get(mx, my)?;

        let primary = self.coverages[0].clone();
        let (abs_x, abs_y) = (primary.start_x + x, primary.start_y + y);

        match cell {
            CellState::NotPresent => return None,
            CellState::Cached { slot, version }
                if self.cache.slot(slot).version == version
                    && running_count <= self.cache.capacity() =>
            {
                self.cache.touch(slot);
                if self.config.report_attributes
                    && self.cache.slot(slot).attribute_text.is_none()
                {
                    let text = provider.subframe_attributes(primary.source, abs_x, abs_y);
                    self.cache.slot_mut(slot).attribute_text = text;
                }
                return Some(Resolved::Pooled(slot));
            }
            _ => {}
        }

        // Miss. A version mismatch lands here too and is never an error.
        if running_count > self.cache.capacity() {
            return self
                .load_throwaway(provider, &primary, abs_x, abs_y)
                .map(Resolved::Throwaway);
        }

        let slot = self.cache.least_recently_used()?;
        self.cache.touch(slot);
        let version = {
            let subframe = self.cache.slot_mut(slot);
            subframe.version += 1;
            subframe.version
        };
        self.matrix.set(mx, my, CellState::Cached { slot, version });

        match provider.subframe_data(primary.source, abs_x, abs_y, self.config.color_model) {
            Ok(Some(pixels)) => {
                let attribute_text = if self.config.report_attributes {
                    provider.subframe_attributes(primary.source, abs_x, abs_y)
                } else {
                    None
                };
                let subframe = self.cache.slot_mut(slot);
                subframe.pixels = Arc::new(pixels);
                subframe.bounds = primary.subframe_bounds(abs_x, abs_y);
                subframe.attribute_text = attribute_text;
                subframe.opacity = self.config.opacity;
                Some(Resolved::Pooled(slot))
            }
            Ok(None) => {
                self.cache.demote(slot);
                self.matrix.set(mx, my, CellState::NotPresent);
                None
            }
            Err(error) => {
                tracing::warn!(%error, abs_x, abs_y, "primary subframe load failed");
                self.cache.demote(slot);
                self.matrix.set(mx, my, CellState::NotPresent);
                None
            }
        }
    }

    /// Try each alternate coverage box for a coordinate the primary box
    /// could not serve.
    ///
    /// Alternate-sourced tiles are always decoded into throwaway
    /// subframes and never recorded in the index matrix: overlapping
    /// alternates writing into the same matrix corrupts the pool at
    /// three-way overlaps.
    ///
    /// Precondition: all boxes of one request share subframe spacing, so
    /// the coordinate translates between boxes by start-index offset.
    fn resolve_from_alternates(
        &self,
        provider: &dyn FrameProvider,
        x: i32,
        y: i32,
    ) -> Option<Subframe> {
        for alternate in self.coverages.iter().skip(1) {
            let (alt_x, alt_y) = (alternate.start_x + x, alternate.start_y + y);
            if !alternate.contains_index(alt_x, alt_y) {
                continue;
            }
            if let Some(subframe) = self.load_throwaway(provider, alternate, alt_x, alt_y) {
                return Some(subframe);
            }
        }
        None
    }

    /// Decode a subframe outside the pool.
    fn load_throwaway(
        &self,
        provider: &dyn FrameProvider,
        cov: &CoverageBox,
        abs_x: i32,
        abs_y: i32,
    ) -> Option<Subframe> {
        match provider.subframe_data(cov.source, abs_x, abs_y, self.config.color_model) {
            Ok(Some(pixels)) => Some(Subframe {
                pixels: Arc::new(pixels),
                version: 0,
                bounds: cov.subframe_bounds(abs_x, abs_y),
                attribute_text: if self.config.report_attributes {
                    provider.subframe_attributes(cov.source, abs_x, abs_y)
                } else {
                    None
                },
                opacity: self.config.opacity,
            }),
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%error, abs_x, abs_y, "subframe load failed");
                None
            }
        }
    }

    /// Renderable form of a subframe; raster data is shared, not copied.
    fn render(&self, subframe: &Subframe) -> RasterTile {
        RasterTile {
            pixels: Arc::clone(&subframe.pixels),
            bounds: subframe.bounds,
            opacity: subframe.opacity,
            attributes: subframe.attribute_text.clone(),
            scale: self.scale,
        }
    }

    /// Pixel-density scale factors: project one subframe interval from the
    /// viewport origin and measure the resulting pixel delta against the
    /// nominal subframe span.
    fn pixel_scale(
        view: &GeoRect,
        projection: &dyn Projection,
        primary: &CoverageBox,
    ) -> (f64, f64) {
        let (x0, y0) = projection.forward(view.north, view.west);
        let (x1, y1) = projection.forward(
            view.north - primary.lat_interval,
            view.west + primary.lon_interval,
        );
        let span = SUBFRAME_PIXEL_SPAN as f64;
        ((x1 - x0).abs() / span, (y1 - y0).abs() / span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorModel;
    use crate::coord::PlateCarree;
    use crate::coverage::SourceId;
    use crate::provider::ProviderError;
    use crate::subframe::PixelData;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Provider stub that serves a fixed set of coverage boxes and counts
    /// every decode request.
    struct StubProvider {
        boxes: Vec<CoverageBox>,
        absent: HashSet<(SourceId, i32, i32)>,
        failing: HashSet<(SourceId, i32, i32)>,
        decodes: Mutex<Vec<(SourceId, i32, i32)>>,
        attribute_fetches: Mutex<usize>,
    }

    impl StubProvider {
        fn new(boxes: Vec<CoverageBox>) -> Self {
            Self {
                boxes,
                absent: HashSet::new(),
                failing: HashSet::new(),
                decodes: Mutex::new(Vec::new()),
                attribute_fetches: Mutex::new(0),
            }
        }

        fn with_absent(mut self, source: SourceId, x: i32, y: i32) -> Self {
            self.absent.insert((source, x, y));
            self
        }

        fn with_decode_error(mut self, source: SourceId, x: i32, y: i32) -> Self {
            self.failing.insert((source, x, y));
            self
        }

        fn decode_count(&self) -> usize {
            self.decodes.lock().unwrap().len()
        }

        fn decodes_for(&self, source: SourceId, x: i32, y: i32) -> usize {
            self.decodes
                .lock()
                .unwrap()
                .iter()
                .filter(|entry| **entry == (source, x, y))
                .count()
        }

        fn attribute_fetches(&self) -> usize {
            *self.attribute_fetches.lock().unwrap()
        }
    }

    impl FrameProvider for StubProvider {
        fn coverage(&self, _view: &GeoRect, _projection: &dyn Projection) -> Vec<CoverageBox> {
            self.boxes.clone()
        }

        fn subframe_data(
            &self,
            source: SourceId,
            x: i32,
            y: i32,
            _model: ColorModel,
        ) -> Result<Option<PixelData>, ProviderError> {
            self.decodes.lock().unwrap().push((source, x, y));
            if self.absent.contains(&(source, x, y)) {
                return Ok(None);
            }
            if self.failing.contains(&(source, x, y)) {
                return Err(ProviderError::Decode("vq table truncated".into()));
            }
            Ok(Some(PixelData::Direct(vec![0xFF00FF00; 4])))
        }

        fn subframe_attributes(&self, source: SourceId, x: i32, y: i32) -> Option<String> {
            *self.attribute_fetches.lock().unwrap() += 1;
            Some(format!("CADRG {}:{} ({}, {})", source.table, source.entry, x, y))
        }
    }

    fn cov(source: SourceId, start: (i32, i32), end: (i32, i32)) -> CoverageBox {
        CoverageBox {
            source,
            nw_lat: 40.0,
            nw_lon: -120.0,
            lat_interval: 1.0,
            lon_interval: 1.0,
            start_x: start.0,
            start_y: start.1,
            end_x: end.0,
            end_y: end.1,
            percent_coverage: 100.0,
        }
    }

    fn view() -> GeoRect {
        GeoRect::new(40.0, -120.0, 36.0, -116.0)
    }

    fn proj() -> PlateCarree {
        PlateCarree::new(256.0)
    }

    const PRIMARY: SourceId = SourceId { table: 0, entry: 0 };
    const ALTERNATE: SourceId = SourceId { table: 1, entry: 0 };

    #[test]
    fn test_set_cache_without_coverage_is_invalid() {
        let provider = StubProvider::new(Vec::new());
        let mut handler = CacheHandler::new(CacheConfig::default(), 4);

        let mut out = Vec::new();
        handler.get_subframes(&provider, &view(), &proj(), &mut out);

        assert!(!handler.is_valid());
        assert!(out.is_empty());
        assert_eq!(provider.decode_count(), 0);
    }

    #[test]
    fn test_get_subframes_output_in_scan_order() {
        // Capacity-3 pool, four tiles requested at (0,0)..(0,3): the
        // fourth exceeds capacity and must decode into a throwaway, yet
        // the output still holds all four entries in request order.
        let provider = StubProvider::new(vec![cov(PRIMARY, (0, 0), (0, 3))]);
        let config = CacheConfig::default().with_buffer_margin(1);
        let mut handler = CacheHandler::new(config, 3);

        let mut out = Vec::new();
        handler.get_subframes(&provider, &view(), &proj(), &mut out);

        assert_eq!(out.len(), 4);
        assert_eq!(provider.decode_count(), 4);
        for (i, tile) in out.iter().enumerate() {
            assert_eq!(tile.bounds.north, 40.0 - i as f64);
        }

        // The overflow tile never claimed a matrix cell.
        assert_eq!(handler.matrix.get(1, 4), Some(CellState::NotCached));
        // The tiles within capacity did.
        assert!(matches!(
            handler.matrix.get(1, 1),
            Some(CellState::Cached { .. })
        ));
    }

    #[test]
    fn test_repeated_request_hits_cache() {
        let provider = StubProvider::new(vec![cov(PRIMARY, (0, 0), (1, 1))]);
        let mut handler = CacheHandler::new(CacheConfig::default(), 20);

        let mut out = Vec::new();
        handler.get_subframes(&provider, &view(), &proj(), &mut out);
        assert_eq!(provider.decode_count(), 4);

        out.clear();
        handler.get_subframes(&provider, &view(), &proj(), &mut out);

        // Unchanged viewport: everything served from the pool.
        assert_eq!(out.len(), 4);
        assert_eq!(provider.decode_count(), 4);
    }

    #[test]
    fn test_version_staleness_forces_reload() {
        // Capacity-1 pool: loading a second coordinate recycles the only
        // slot, so the first coordinate's matrix entry must go stale.
        let provider = StubProvider::new(vec![cov(PRIMARY, (0, 0), (0, 1))]);
        let config = CacheConfig::default().with_buffer_margin(0);
        let mut handler = CacheHandler::new(config, 1);
        handler.set_cache(&provider, &view(), &proj());

        assert!(matches!(
            handler.resolve(&provider, 0, 0, 1),
            Some(Resolved::Pooled(_))
        ));
        assert!(matches!(
            handler.resolve(&provider, 0, 1, 1),
            Some(Resolved::Pooled(_))
        ));

        // Slot recycled for (0,1): the (0,0) cell records an old version
        // and must resolve as a miss, not a hit.
        assert!(matches!(
            handler.resolve(&provider, 0, 0, 1),
            Some(Resolved::Pooled(_))
        ));
        assert_eq!(provider.decodes_for(PRIMARY, 0, 0), 2);
    }

    #[test]
    fn test_not_present_is_not_retried() {
        let provider =
            StubProvider::new(vec![cov(PRIMARY, (0, 0), (1, 1))]).with_absent(PRIMARY, 0, 0);
        let config = CacheConfig::default().with_buffer_margin(0);
        let mut handler = CacheHandler::new(config, 4);
        handler.set_cache(&provider, &view(), &proj());

        assert!(handler.resolve(&provider, 0, 0, 1).is_none());
        assert_eq!(handler.matrix.get(0, 0), Some(CellState::NotPresent));

        assert!(handler.resolve(&provider, 0, 0, 1).is_none());
        assert_eq!(provider.decodes_for(PRIMARY, 0, 0), 1);
    }

    #[test]
    fn test_failed_load_returns_slot_to_eviction_pool() {
        let provider =
            StubProvider::new(vec![cov(PRIMARY, (0, 0), (1, 1))]).with_absent(PRIMARY, 0, 0);
        let config = CacheConfig::default().with_buffer_margin(0);
        let mut handler = CacheHandler::new(config, 3);
        handler.set_cache(&provider, &view(), &proj());

        let claimed = handler.cache.least_recently_used().unwrap();
        assert!(handler.resolve(&provider, 0, 0, 1).is_none());
        // The slot claimed for the failed load is LRU again.
        assert_eq!(handler.cache.least_recently_used(), Some(claimed));
    }

    #[test]
    fn test_decode_error_treated_as_absent_tile() {
        // A provider error at one coordinate degrades to a gap: the tile
        // is omitted, the cell is marked not-present so the failure is
        // not retried, and the claimed slot returns to the eviction pool.
        let provider = StubProvider::new(vec![cov(PRIMARY, (0, 0), (1, 1))])
            .with_decode_error(PRIMARY, 1, 0);
        let config = CacheConfig::default().with_buffer_margin(0);
        let mut handler = CacheHandler::new(config, 3);

        let mut out = Vec::new();
        handler.get_subframes(&provider, &view(), &proj(), &mut out);

        assert_eq!(out.len(), 3);
        assert_eq!(handler.matrix.get(1, 0), Some(CellState::NotPresent));
        assert_eq!(provider.decodes_for(PRIMARY, 1, 0), 1);

        // Repaint: the known failure is not re-requested and the rest
        // still serve from the pool.
        out.clear();
        handler.get_subframes(&provider, &view(), &proj(), &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(provider.decodes_for(PRIMARY, 1, 0), 1);
    }

    #[test]
    fn test_decode_error_returns_slot_to_eviction_pool() {
        let provider = StubProvider::new(vec![cov(PRIMARY, (0, 0), (1, 1))])
            .with_decode_error(PRIMARY, 0, 0);
        let config = CacheConfig::default().with_buffer_margin(0);
        let mut handler = CacheHandler::new(config, 3);
        handler.set_cache(&provider, &view(), &proj());

        let claimed = handler.cache.least_recently_used().unwrap();
        assert!(handler.resolve(&provider, 0, 0, 1).is_none());
        assert_eq!(handler.cache.least_recently_used(), Some(claimed));
    }

    #[test]
    fn test_alternate_fallback_never_pollutes_matrix() {
        // Primary has no data at its (5,5); the alternate covers the same
        // geography under its own grid offset and serves it instead.
        let primary = cov(PRIMARY, (5, 5), (6, 6));
        let alternate = cov(ALTERNATE, (2, 2), (3, 3));
        let provider =
            StubProvider::new(vec![primary, alternate]).with_absent(PRIMARY, 5, 5);
        let config = CacheConfig::default().with_buffer_margin(0);
        let mut handler = CacheHandler::new(config, 4);
        handler.set_cache(&provider, &view(), &proj());

        assert!(handler.resolve(&provider, 0, 0, 1).is_none());
        let fallback = handler.resolve_from_alternates(&provider, 0, 0);
        assert!(fallback.is_some());
        assert_eq!(provider.decodes_for(ALTERNATE, 2, 2), 1);

        // The matrix keeps the primary's verdict; the alternate tile is
        // throwaway and never indexed.
        assert_eq!(handler.matrix.get(0, 0), Some(CellState::NotPresent));
    }

    #[test]
    fn test_alternate_outside_range_is_skipped() {
        let primary = cov(PRIMARY, (0, 0), (3, 3));
        // Alternate only covers a 1x1 start corner; translated coordinates
        // beyond it must not be requested.
        let alternate = cov(ALTERNATE, (0, 0), (0, 0));
        let provider = StubProvider::new(vec![primary, alternate])
            .with_absent(PRIMARY, 2, 2)
            .with_absent(ALTERNATE, 2, 2);
        let config = CacheConfig::default().with_buffer_margin(0);
        let mut handler = CacheHandler::new(config, 20);
        handler.set_cache(&provider, &view(), &proj());

        assert!(handler.resolve(&provider, 2, 2, 1).is_none());
        assert!(handler.resolve_from_alternates(&provider, 2, 2).is_none());
        assert_eq!(provider.decodes_for(ALTERNATE, 2, 2), 0);
    }

    #[test]
    fn test_matrix_survives_unchanged_geometry() {
        let provider = StubProvider::new(vec![cov(PRIMARY, (0, 0), (1, 1))]);
        let config = CacheConfig::default().with_buffer_margin(0);
        let mut handler = CacheHandler::new(config, 4);

        handler.set_cache(&provider, &view(), &proj());
        assert!(matches!(
            handler.resolve(&provider, 0, 0, 1),
            Some(Resolved::Pooled(_))
        ));

        handler.set_cache(&provider, &view(), &proj());
        assert!(matches!(
            handler.matrix.get(0, 0),
            Some(CellState::Cached { .. })
        ));
    }

    #[test]
    fn test_matrix_rebuilt_on_new_geometry() {
        let first = StubProvider::new(vec![cov(PRIMARY, (0, 0), (1, 1))]);
        let moved = StubProvider::new(vec![cov(PRIMARY, (4, 4), (5, 5))]);
        let config = CacheConfig::default().with_buffer_margin(0);
        let mut handler = CacheHandler::new(config, 4);

        handler.set_cache(&first, &view(), &proj());
        assert!(matches!(
            handler.resolve(&first, 0, 0, 1),
            Some(Resolved::Pooled(_))
        ));

        handler.set_cache(&moved, &view(), &proj());
        assert_eq!(handler.matrix.get(0, 0), Some(CellState::NotCached));
    }

    #[test]
    fn test_out_of_matrix_coordinate_is_no_data() {
        let provider = StubProvider::new(vec![cov(PRIMARY, (0, 0), (1, 1))]);
        let config = CacheConfig::default().with_buffer_margin(0);
        let mut handler = CacheHandler::new(config, 4);
        handler.set_cache(&provider, &view(), &proj());

        assert!(handler.resolve(&provider, -1, 0, 1).is_none());
        assert!(handler.resolve(&provider, 0, 99, 1).is_none());
        assert_eq!(provider.decode_count(), 0);
    }

    #[test]
    fn test_zero_capacity_pool_serves_throwaways() {
        let provider = StubProvider::new(vec![cov(PRIMARY, (0, 0), (1, 1))]);
        let mut handler = CacheHandler::new(CacheConfig::default(), 0);

        let mut out = Vec::new();
        handler.get_subframes(&provider, &view(), &proj(), &mut out);

        assert_eq!(out.len(), 4);
        // Every repaint decodes again; degraded but functional.
        out.clear();
        handler.get_subframes(&provider, &view(), &proj(), &mut out);
        assert_eq!(provider.decode_count(), 8);
    }

    #[test]
    fn test_scale_factor_attached_to_tiles() {
        let provider = StubProvider::new(vec![cov(PRIMARY, (0, 0), (0, 0))]);
        let config = CacheConfig::default().with_scale_images(true);
        let mut handler = CacheHandler::new(config, 4);

        let mut out = Vec::new();
        // 256 px/degree and a 1-degree interval: one subframe interval
        // projects to exactly the nominal 256-pixel span.
        handler.get_subframes(&provider, &view(), &proj(), &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].scale, Some((1.0, 1.0)));
    }

    #[test]
    fn test_attributes_fetched_lazily_once() {
        let provider = StubProvider::new(vec![cov(PRIMARY, (0, 0), (0, 0))]);
        let config = CacheConfig::default().with_report_attributes(true);
        let mut handler = CacheHandler::new(config, 4);

        let mut out = Vec::new();
        handler.get_subframes(&provider, &view(), &proj(), &mut out);
        assert_eq!(provider.attribute_fetches(), 1);
        assert!(out[0].attributes.is_some());

        // Hit path: attribute text already resident, no refetch.
        out.clear();
        handler.get_subframes(&provider, &view(), &proj(), &mut out);
        assert_eq!(provider.attribute_fetches(), 1);
        assert!(out[0].attributes.is_some());
    }

    #[test]
    fn test_opacity_applied_to_output() {
        let provider = StubProvider::new(vec![cov(PRIMARY, (0, 0), (0, 0))]);
        let config = CacheConfig::default().with_opacity(100);
        let mut handler = CacheHandler::new(config, 4);

        let mut out = Vec::new();
        handler.get_subframes(&provider, &view(), &proj(), &mut out);
        assert_eq!(out[0].opacity, 100);
    }
}
