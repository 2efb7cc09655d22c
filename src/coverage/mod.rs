//! Coverage boxes: one catalog region's contribution to a request.
//!
//! The frame provider answers a geographic query with a list of
//! [`CoverageBox`]es, ordered by descending preference. The first box is
//! the primary source for the request; any further boxes describe
//! overlapping alternate sources consulted only when the primary has no
//! data at a coordinate.

use crate::coord::GeoRect;

/// Identifies one catalog entry a subframe can be decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId {
    /// Table-of-contents index within the catalog.
    pub table: usize,
    /// Entry index within the table.
    pub entry: usize,
}

impl SourceId {
    /// Create a new source identifier.
    pub fn new(table: usize, entry: usize) -> Self {
        Self { table, entry }
    }
}

/// One catalog region's geographic extent and subframe grid for a request.
///
/// Created fresh on every viewport change and immutable once constructed.
/// `start_x/start_y` and `end_x/end_y` are the inclusive subframe indices
/// (in the entry's own grid) needed to satisfy the requested rectangle;
/// `nw_lat/nw_lon` is the geographic upper-left corner of the subframe at
/// `(start_x, start_y)`.
///
/// Subframe indices grow eastward in x and southward in y.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageBox {
    /// Catalog entry this box decodes from.
    pub source: SourceId,
    /// Latitude of the north-west corner of the starting subframe.
    pub nw_lat: f64,
    /// Longitude of the north-west corner of the starting subframe.
    pub nw_lon: f64,
    /// Angular height of one subframe in degrees of latitude.
    pub lat_interval: f64,
    /// Angular width of one subframe in degrees of longitude.
    pub lon_interval: f64,
    /// First subframe column covering the request (inclusive).
    pub start_x: i32,
    /// First subframe row covering the request (inclusive).
    pub start_y: i32,
    /// Last subframe column covering the request (inclusive).
    pub end_x: i32,
    /// Last subframe row covering the request (inclusive).
    pub end_y: i32,
    /// Percentage of the requested area this box actually covers (0-100).
    pub percent_coverage: f64,
}

impl CoverageBox {
    /// Number of subframe columns in the start..=end range.
    pub fn horizontal_subframes(&self) -> usize {
        (self.end_x - self.start_x + 1).max(0) as usize
    }

    /// Number of subframe rows in the start..=end range.
    pub fn vertical_subframes(&self) -> usize {
        (self.end_y - self.start_y + 1).max(0) as usize
    }

    /// Whether the given entry-grid subframe index lies inside this box's
    /// start..=end range.
    pub fn contains_index(&self, x: i32, y: i32) -> bool {
        x >= self.start_x && x <= self.end_x && y >= self.start_y && y <= self.end_y
    }

    /// Geographic bounds of the subframe at entry-grid index `(x, y)`.
    ///
    /// Computed from the box origin and the angular spacing; y grows
    /// southward from `nw_lat`, x grows eastward from `nw_lon`.
    pub fn subframe_bounds(&self, x: i32, y: i32) -> GeoRect {
        let north = self.nw_lat - (y - self.start_y) as f64 * self.lat_interval;
        let west = self.nw_lon + (x - self.start_x) as f64 * self.lon_interval;
        GeoRect::new(north, west, north - self.lat_interval, west + self.lon_interval)
    }
}
