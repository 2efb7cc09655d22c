//! Geographic coordinate types and the projection capability.
//!
//! A [`GeoRect`] is a plain north/west/south/east rectangle in decimal
//! degrees. The cache never wraps a rectangle past the antimeridian or the
//! equator itself; the manager splits straddling viewports before any
//! rectangle reaches a handler.

/// Valid latitude range.
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range.
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Offset used when clamping a split rectangle just short of the
/// antimeridian or the equator, in decimal degrees.
pub const BOUNDARY_EPSILON: f64 = 0.0001;

/// A geographic rectangle in decimal degrees.
///
/// `north >= south` and `west <= east` for every rectangle handed to a
/// cache handler; the manager is responsible for splitting viewports that
/// wrap past +/-180 degrees longitude or cross the equator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRect {
    /// Northern edge (upper-left latitude).
    pub north: f64,
    /// Western edge (upper-left longitude).
    pub west: f64,
    /// Southern edge (lower-right latitude).
    pub south: f64,
    /// Eastern edge (lower-right longitude).
    pub east: f64,
}

impl GeoRect {
    /// Create a new rectangle from its corner coordinates.
    pub fn new(north: f64, west: f64, south: f64, east: f64) -> Self {
        Self {
            north,
            west,
            south,
            east,
        }
    }

    /// Height of the rectangle in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Width of the rectangle in degrees of longitude.
    ///
    /// Only meaningful for non-wrapping rectangles.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Whether the upper-left/lower-right corners straddle the 180 degree
    /// meridian (upper-left longitude positive, lower-right negative).
    pub fn crosses_dateline(&self) -> bool {
        self.west > 0.0 && self.east < 0.0
    }

    /// Whether the upper-left/lower-right corners straddle the equator
    /// (upper-left latitude positive, lower-right negative).
    pub fn crosses_equator(&self) -> bool {
        self.north > 0.0 && self.south < 0.0
    }
}

/// Projection capability consumed by the cache.
///
/// The cache itself never draws pixels; it only consults the projection to
/// measure the on-screen pixel density of one subframe interval when
/// configured to rescale cached imagery.
pub trait Projection {
    /// Project a geographic coordinate to screen pixel coordinates.
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64);
}

/// Trivial equirectangular projection with a uniform pixel density.
///
/// Useful for tests and demos; real callers supply their own projection.
#[derive(Debug, Clone, Copy)]
pub struct PlateCarree {
    /// Screen pixels per degree of latitude/longitude.
    pub pixels_per_degree: f64,
}

impl PlateCarree {
    /// Create a projection with the given pixel density.
    pub fn new(pixels_per_degree: f64) -> Self {
        Self { pixels_per_degree }
    }
}

impl Projection for PlateCarree {
    fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        // Screen y grows downward, latitude grows upward.
        (
            (lon - MIN_LON) * self.pixels_per_degree,
            (MAX_LAT - lat) * self.pixels_per_degree,
        )
    }
}
