//! Cache manager: quadrant decomposition over up to four handlers.
//!
//! A single rectangular subframe-index space cannot represent a viewport
//! that wraps past +/-180 degrees longitude or crosses the equator without
//! discontinuities in the index arithmetic. The manager therefore splits
//! such a viewport into up to four non-wrapping sub-rectangles, each served
//! by its own [`CacheHandler`] with an independent pool, and concatenates
//! the results.

use std::sync::Arc;

use crate::config::CacheConfig;
use crate::coord::{GeoRect, Projection, BOUNDARY_EPSILON, MAX_LON, MIN_LON};
use crate::handler::CacheHandler;
use crate::provider::FrameProvider;
use crate::subframe::RasterTile;

/// Quadrant slot for the primary (possibly clamped) viewport rectangle.
const PRIMARY: usize = 0;
/// Quadrant slot for the far side of the antimeridian.
const DATELINE: usize = 1;
/// Quadrant slot for the far side of the equator.
const EQUATOR: usize = 2;
/// Quadrant slot diagonal to the primary (both crossings).
const BOTH: usize = 3;

/// Entry point of the subframe cache.
///
/// Owns up to four lazily created quadrant handlers. Each
/// [`get_rectangle`](CacheManager::get_rectangle) call recomputes the
/// quadrant decomposition from scratch and releases handlers whose
/// quadrant is no longer needed, so stale capacity does not accumulate
/// across requests with changing viewports.
pub struct CacheManager {
    config: CacheConfig,
    provider: Option<Arc<dyn FrameProvider>>,
    handlers: [Option<CacheHandler>; 4],
    /// Set once the missing-provider condition has been reported.
    provider_warned: bool,
}

impl CacheManager {
    /// Create a manager with no frame provider attached.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            provider: None,
            handlers: [None, None, None, None],
            provider_warned: false,
        }
    }

    /// Attach or replace the frame provider.
    ///
    /// Cached lookups from the previous provider are flushed.
    pub fn set_frame_provider(&mut self, provider: Arc<dyn FrameProvider>) {
        self.provider = Some(provider);
        self.provider_warned = false;
        self.invalidate();
    }

    /// Flush every quadrant's cached lookups.
    ///
    /// Call when rendering attributes change out from under the cache.
    pub fn invalidate(&mut self) {
        for handler in self.handlers.iter_mut().flatten() {
            handler.clear();
        }
    }

    /// Resolve every subframe visible in the viewport.
    ///
    /// The sole entry point used by the rendering layer. Returns tiles in
    /// quadrant order (primary, dateline-complement, equator-complement,
    /// both-complement), each quadrant in its handler's scan order. Missing
    /// tiles are simply absent from the result; this never fails.
    pub fn get_rectangle(
        &mut self,
        view: &GeoRect,
        projection: &dyn Projection,
    ) -> Vec<RasterTile> {
        let Some(provider) = self.provider.clone() else {
            if !self.provider_warned {
                tracing::error!("frame provider is not set; serving empty coverage");
                self.provider_warned = true;
            }
            return Vec::new();
        };

        let mut out = Vec::new();
        for (quadrant, rect) in Self::decompose(view).into_iter().enumerate() {
            match rect {
                Some(rect) => {
                    let capacity = if quadrant == PRIMARY {
                        self.config.subframe_cache_size
                    } else {
                        self.config.aux_cache_size
                    };
                    let config = self.config.clone();
                    let handler = self.handlers[quadrant]
                        .get_or_insert_with(|| CacheHandler::new(config, capacity));
                    handler.get_subframes(provider.as_ref(), &rect, projection, &mut out);
                }
                None => {
                    // Quadrant not needed this call: release its handler so
                    // its pool does not linger.
                    self.handlers[quadrant] = None;
                }
            }
        }
        out
    }

    /// Split the viewport into at most four non-wrapping rectangles.
    ///
    /// Index 0 is always present. A viewport with an unsupported wrap
    /// (west of east without the positive-to-negative antimeridian sign
    /// pattern) is declined entirely.
    fn decompose(view: &GeoRect) -> [Option<GeoRect>; 4] {
        let crosses_dateline = view.crosses_dateline();
        if view.west > view.east && !crosses_dateline {
            tracing::warn!(?view, "unsupported longitude wrap; declining viewport");
            return [None, None, None, None];
        }
        let crosses_equator = view.crosses_equator();

        // Clamp the primary rectangle just short of each crossed boundary.
        let east = if crosses_dateline {
            MAX_LON - BOUNDARY_EPSILON
        } else {
            view.east
        };
        let south = if crosses_equator {
            BOUNDARY_EPSILON
        } else {
            view.south
        };

        let mut rects = [None, None, None, None];
        rects[PRIMARY] = Some(GeoRect::new(view.north, view.west, south, east));
        if crosses_dateline {
            rects[DATELINE] = Some(GeoRect::new(
                view.north,
                MIN_LON + BOUNDARY_EPSILON,
                south,
                view.east,
            ));
        }
        if crosses_equator {
            rects[EQUATOR] = Some(GeoRect::new(
                -BOUNDARY_EPSILON,
                view.west,
                view.south,
                east,
            ));
        }
        if crosses_dateline && crosses_equator {
            rects[BOTH] = Some(GeoRect::new(
                -BOUNDARY_EPSILON,
                MIN_LON + BOUNDARY_EPSILON,
                view.south,
                view.east,
            ));
        }
        rects
    }
}
